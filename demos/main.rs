use huffman_rs::{compress_bytes, decompress_bytes, size_report, Artifact};
use std::env;
use std::fs;
use std::process;

/// Compresses a file, writes `<filename>.huf`, reloads it and verifies the round trip.
///
/// Usage: cargo run --example main <filename>
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <filename>", args[0]);
        process::exit(1);
    }

    let filename = &args[1];
    let original = fs::read(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        process::exit(1);
    });

    let compressed = compress_bytes(&original).unwrap_or_else(|err| {
        eprintln!("Compression failed: {}", err);
        process::exit(1);
    });

    let artifact_path = format!("{}.huf", filename);
    if let Err(err) = compressed.artifact.save(&artifact_path) {
        eprintln!("Cannot write \"{}\": {}", artifact_path, err);
        process::exit(1);
    }

    // Verify by reloading from disk
    let restored = Artifact::load(&artifact_path)
        .and_then(|artifact| decompress_bytes(&artifact))
        .unwrap_or_else(|err| {
            eprintln!("Cannot decompress \"{}\": {}", artifact_path, err);
            process::exit(1);
        });

    if restored != original {
        eprintln!("Mismatch: restored {} bytes, expected {}", restored.len(), original.len());
        process::exit(1);
    }

    println!("=== Codes ===");
    for (symbol, code) in compressed.codes.sorted() {
        let count = compressed.frequencies.get(symbol);
        println!("{:#04x} {:>10} {}", symbol, count, code);
    }

    let report = size_report(&original, &compressed.artifact).unwrap_or_else(|err| {
        eprintln!("Cannot read sizes from \"{}\": {}", artifact_path, err);
        process::exit(1);
    });

    println!("\n=== Statistics ===");
    println!("Original bytes: {}", report.original_bytes);
    println!("Distinct symbols: {}", compressed.frequencies.len());
    println!("Encoded bits: {}", report.bit_count);
    println!("Payload bytes: {}", report.compressed_bytes);
    println!("Artifact bytes: {}", report.artifact_bytes);
    if report.original_bytes > 0 {
        println!("Compression ratio: {:.2}%", report.compression_ratio());
        println!("Bits per symbol: {:.3}", report.bits_per_symbol());
    }
}
