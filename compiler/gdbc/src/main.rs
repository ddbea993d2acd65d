//! GDSC token buffer CLI.

use gdbc::commands::{compress_file, decompress_file, dump_file, parse_compression_options};

fn main() {
    gdbc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "compress" => {
            if args.len() < 4 {
                eprintln!("Usage: gdbc compress <in> <out> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --level=<n>         zstd compression level (default: 3)");
                eprintln!("  --long              Enable long-distance matching");
                eprintln!("  --window-log=<n>    Window log with --long (default: 27)");
                std::process::exit(1);
            }
            let config = match parse_compression_options(&args[4..]) {
                Ok(config) => config,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            compress_file(&args[2], &args[3], config);
        }
        "decompress" => {
            if args.len() < 4 {
                eprintln!("Usage: gdbc decompress <in> <out>");
                std::process::exit(1);
            }
            decompress_file(&args[2], &args[3]);
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: gdbc dump <in>");
                std::process::exit(1);
            }
            dump_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("gdbc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("GDSC token buffer tool");
    println!();
    println!("Usage: gdbc <command> [options]");
    println!();
    println!("Commands:");
    println!("  compress <in> <out>     Compress a stored token buffer");
    println!("  decompress <in> <out>   Restore the stored form of a buffer");
    println!("  dump <in>               Print the header and replayed token stream");
    println!("  help                    Show this help message");
    println!("  version                 Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics.");
}
