//! Telnet login example: log in to a console over a raw TCP connection.
//!
//! Connects to a Telnet console (no option negotiation, which most terminal
//! servers and ERS switches tolerate), runs the login handshake and prints
//! the captured transcript.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example telnet_login -- --host 192.168.1.10 --user admin --password secret
//! ```
//!
//! Set `RUST_LOG=debug` to watch each recognized prompt.

use std::env;

use ferrilogin::{Authenticator, IoChannel, LoginBuilder, LoginStatus, Transport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("Connecting to {}:{}...", args.host, args.port);
    let stream = tokio::net::TcpStream::connect((args.host.as_str(), args.port)).await?;
    let mut channel = IoChannel::new(stream);

    let login = LoginBuilder::new(&args.host)
        .username(&args.user)
        .password(&args.password)
        .platform(&args.platform)
        .transport(Transport::Telnet)
        .build()?;

    match login.authenticate(&mut channel, args.delay_factor).await {
        Ok(outcome) => {
            println!("{}", "-".repeat(50));
            println!("{}", outcome.transcript().unwrap_or_default());
            println!("{}", "-".repeat(50));
            if outcome.status == LoginStatus::PromptConfirmed {
                println!("Logged in after {} read cycles", outcome.cycles);
            }
        }
        Err(e) => {
            // The channel is already closed at this point
            eprintln!("{}", e);
            if let ferrilogin::Error::Authentication(auth) = &e {
                eprintln!("Captured before failure:\n{}", auth.transcript);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: String,
    platform: String,
    delay_factor: f64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 23u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = String::new();
        let mut platform = "extreme_ers".to_string();
        let mut delay_factor = 1.0;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(23);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = args[i].clone();
                    }
                }
                "--platform" => {
                    i += 1;
                    if i < args.len() {
                        platform = args[i].clone();
                    }
                }
                "--delay-factor" | "-d" => {
                    i += 1;
                    if i < args.len() {
                        delay_factor = args[i].parse().unwrap_or(1.0);
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            platform,
            delay_factor,
        }
    }

    fn print_help() {
        println!(
            r#"ferrilogin telnet_login example

USAGE:
    cargo run --example telnet_login -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>          Target host [default: localhost]
    -p, --port <PORT>          Telnet port [default: 23]
    -u, --user <USER>          Username [default: $USER]
    -P, --password <PASS>      Password [default: empty]
    --platform <NAME>          Login profile [default: extreme_ers]
    -d, --delay-factor <N>     Stretch every wait by N [default: 1.0]
    --help                     Print this help message
"#
        );
    }
}
