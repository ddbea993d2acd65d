//! Command handlers for the `gdbc` CLI.
//!
//! The `*_file` handlers do the I/O and exit the process with status 1 on
//! failure. The work itself is in plain functions returning `Result`.

use gdbc_buffer::{
    compress_buffer, decompress_buffer, read_header, BufferError, CompressionConfig, TokenBuffer,
    ZstdCompressor,
};
use gdbc_token::Token;

/// Compress a stored buffer. Already compressed input is copied unchanged.
pub fn compress_file(input: &str, output: &str, config: CompressionConfig) {
    let buffer = read_file(input);
    let compressed = compress_buffer(&buffer, &ZstdCompressor::new(config))
        .unwrap_or_else(|e| fail(&format!("{input}: {e}")));
    tracing::info!(
        input = buffer.len(),
        output = compressed.len(),
        "compressed {input}"
    );
    write_file(output, &compressed);
}

/// Decompress a buffer back to its stored form.
pub fn decompress_file(input: &str, output: &str) {
    let buffer = read_file(input);
    let stored = decompress_buffer(&buffer, &ZstdCompressor::default())
        .unwrap_or_else(|e| fail(&format!("{input}: {e}")));
    write_file(output, &stored);
}

/// Print the header, table sizes, and replayed token stream of a buffer.
pub fn dump_file(input: &str) {
    let buffer = read_file(input);
    match render_dump(&buffer) {
        Ok(text) => print!("{text}"),
        Err(e) => fail(&format!("{input}: {e}")),
    }
}

/// Render a buffer the way `gdbc dump` prints it.
pub fn render_dump(buffer: &[u8]) -> Result<String, BufferError> {
    let header = read_header(buffer)?;
    let mut tokens = TokenBuffer::from_bytes(buffer)?;

    let mut out = if header.is_compressed() {
        format!(
            "GDSC v{}, zstd ({} bytes, {} uncompressed)\n",
            header.version,
            buffer.len(),
            header.uncompressed_len
        )
    } else {
        format!("GDSC v{}, stored ({} bytes)\n", header.version, buffer.len())
    };
    out.push_str(&format!(
        "identifiers: {}  constants: {}  positions: {}  tokens: {}\n\n",
        tokens.identifiers().len(),
        tokens.constants().len(),
        tokens.position_count(),
        tokens.token_count()
    ));

    loop {
        let token = tokens.scan();
        out.push_str(&dump_line(&token));
        out.push('\n');
        if token.is_eof() {
            return Ok(out);
        }
    }
}

/// Synthesized tokens (layout and end of file) print in angle brackets.
fn dump_line(token: &Token) -> String {
    if token.tag.is_whitespace() || token.is_eof() {
        format!("{:>5} <{}>", token.span.start_line, token.tag)
    } else {
        token.to_string()
    }
}

/// Parse `compress` options (`--level=<n>`, `--long`, `--window-log=<n>`).
pub fn parse_compression_options(args: &[String]) -> Result<CompressionConfig, String> {
    let mut config = CompressionConfig::default();
    for arg in args {
        if let Some(level) = arg.strip_prefix("--level=") {
            config.level = level
                .parse()
                .map_err(|_| format!("invalid compression level '{level}'"))?;
        } else if let Some(log) = arg.strip_prefix("--window-log=") {
            config.window_log = log
                .parse()
                .map_err(|_| format!("invalid window log '{log}'"))?;
        } else if arg == "--long" {
            config.long_distance_matching = true;
        } else {
            return Err(format!("unknown option '{arg}'"));
        }
    }
    Ok(config)
}

fn read_file(path: &str) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            fail(&msg)
        }
    }
}

fn write_file(path: &str, content: &[u8]) {
    if let Err(e) = std::fs::write(path, content) {
        fail(&format!("error writing '{path}': {e}"));
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}
