//! Interactive explorer for the finger-pattern gesture table.
//! Type a 5-bit pattern and see which command it would dispatch.

use hand_gesture::{FingerState, PatternClassifier};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            Hand Gesture Pattern Explorer             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Enter five digits (thumb index middle ring pinky),");
    println!("  e.g. 11000 for thumb+index. `all` lists the table, q quits.");
    println!();

    loop {
        let line = read_line("pattern> ");
        let line = line.trim();

        if line.eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }
        if line.eq_ignore_ascii_case("all") {
            print_table();
            continue;
        }

        match parse_pattern(line) {
            Some(fs) => print_row(fs),
            None => println!("  ⚠  Expected exactly five 0/1 digits, `all`, or q."),
        }
    }
}

fn parse_pattern(s: &str) -> Option<FingerState> {
    let digits: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != 5 || !digits.iter().all(|c| *c == '0' || *c == '1') {
        return None;
    }
    let mut f = [false; 5];
    for (i, c) in digits.iter().enumerate() {
        f[i] = *c == '1';
    }
    Some(FingerState(f))
}

fn print_row(fs: FingerState) {
    match PatternClassifier::lookup(fs) {
        Some(g) => println!("  {fs}  →  {g}"),
        None    => println!("  {fs}  →  (none)"),
    }
}

fn print_table() {
    println!();
    for bits in 0u8..32 {
        let fs = FingerState::from_bits(bits);
        if PatternClassifier::lookup(fs).is_some() {
            print_row(fs);
        }
    }
    println!();
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
