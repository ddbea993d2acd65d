use super::*;
use pretty_assertions::assert_eq;

#[test]
fn constructors_attach_payloads() {
    let span = Span::on_line(2, 4, 7);

    let ident = Token::identifier("foo", span);
    assert_eq!(ident.tag, TokenTag::Identifier);
    assert_eq!(ident.name(), Some("foo"));
    assert_eq!(ident.literal_value(), None);

    let annotation = Token::annotation("export", span);
    assert_eq!(annotation.tag, TokenTag::Annotation);
    assert_eq!(annotation.name(), Some("export"));

    let literal = Token::literal(3.5, span);
    assert_eq!(literal.literal_value(), Some(&Variant::Float(3.5)));
    assert_eq!(literal.name(), None);
}

#[test]
fn error_token_carries_message_as_string() {
    let token = Token::error("Unterminated string.", Span::at(4, 8));
    assert_eq!(token.tag, TokenTag::Error);
    assert_eq!(
        token.literal_value().and_then(Variant::as_str),
        Some("Unterminated string.")
    );
}

#[test]
fn synthetic_tokens_are_zero_width() {
    let token = Token::synthetic(TokenTag::Newline, 9);
    assert_eq!(token.span, Span::at(9, 0));
    assert_eq!(token.value, TokenValue::None);
}

#[test]
fn display_shows_line_tag_and_payload() {
    assert_eq!(
        Token::identifier("speed", Span::on_line(12, 4, 9)).to_string(),
        "   12 identifier speed"
    );
    assert_eq!(
        Token::new(TokenTag::Colon, Span::on_line(1, 0, 1)).to_string(),
        "    1 :"
    );
    assert_eq!(
        Token::literal("hi", Span::on_line(3, 0, 4)).to_string(),
        "    3 literal String(\"hi\")"
    );
}

#[test]
fn debug_includes_span() {
    let token = Token::identifier("a", Span::new(1, 0, 2, 3));
    assert_eq!(format!("{token:?}"), "Identifier(a) @ 1:0..2:3");
}
