mod assets;
mod cache;
mod files;
mod http;

use std::env;
use std::io::{self, BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;

use clap::Parser;

use files::FileService;

#[derive(Parser)]
#[command(name = "mdserve", about = "Serves a directory of markdown as HTML")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Content root directory. Defaults to the current directory.
    #[arg(long)]
    path: Option<PathBuf>,

    /// Recompile every page on every request instead of reusing
    /// previously compiled copies.
    #[arg(long)]
    compile: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = serve(args) {
        eprintln!("mdserve: {}", err);
        process::exit(1);
    }
}

fn serve(args: Args) -> io::Result<()> {
    let root = match args.path {
        Some(path) => path.canonicalize()?,
        None => env::current_dir()?,
    };
    println!("Serving {} on 127.0.0.1:{}", root.display(), args.port);

    let service = Arc::new(FileService::new(root, args.compile));
    let listener = TcpListener::bind(("127.0.0.1", args.port))?;

    spawn_console();

    for connection in listener.incoming() {
        match connection {
            Ok(stream) => {
                let service = Arc::clone(&service);
                thread::spawn(move || handle_connection(stream, &service));
            }
            Err(err) => eprintln!("connection failed: {}", err),
        }
    }
    Ok(())
}

/// Reads commands from stdin so the server can be stopped from its own
/// terminal.
fn spawn_console() {
    thread::spawn(|| {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim() == "stop" {
                println!("Stopping");
                process::exit(0);
            }
        }
    });
}

fn handle_connection(mut stream: TcpStream, service: &FileService) {
    let mut request_line = String::new();
    {
        let mut reader = BufReader::new(&stream);
        if reader.read_line(&mut request_line).is_err() {
            return;
        }
    }

    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("REQUEST {} {}", peer, request_line.trim_end());

    let response = match http::request_path(&request_line) {
        Some(path) => service.respond(&path),
        None => http::Response::not_found(),
    };
    if let Err(err) = response.write_to(&mut stream) {
        eprintln!(
            "cannot write {} response to {}: {}",
            response.status(),
            peer,
            err
        );
    }
}
