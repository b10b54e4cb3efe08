use anyhow::{Context, Result};
use argh::FromArgs;
use linecmd::{CommandTable, Interpreter, Reply};
use std::io;
use std::net::{TcpListener, TcpStream};
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(FromArgs)]
/// Serve a tiny `hello` console on the terminal or over TCP.
struct Args {
    /// prompt written before every line of input
    #[argh(option, default = "String::from(linecmd::DEFAULT_PROMPT)")]
    prompt: String,

    /// address to accept consoles on, e.g. 127.0.0.1:6000. Uses stdin/stdout when omitted.
    #[argh(option)]
    listen: Option<String>,
}

fn hello(args: &[String]) -> Reply {
    if args.is_empty() {
        return "What's your name?\n".into();
    }
    format!("Hello, {}\n", args.join(" ")).into()
}

fn commands() -> linecmd::Result<CommandTable> {
    CommandTable::new().with("hello", hello)
}

/// End of input is how a console normally closes.
fn finish(err: linecmd::Error) -> Result<()> {
    if err.is_eof() { Ok(()) } else { Err(err.into()) }
}

fn console(prompt: &str) -> Result<()> {
    let err = Interpreter::new(commands()?, io::stdin().lock(), io::stdout().lock())
        .with_prompt(prompt)
        .repl();
    finish(err)
}

fn session(stream: TcpStream, prompt: &str) -> Result<()> {
    let reader = stream.try_clone().context("could not split connection")?;
    let err = Interpreter::new(commands()?, reader, stream)
        .with_prompt(prompt)
        .repl();
    finish(err)
}

fn serve(addr: &str, prompt: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).with_context(|| format!("could not open {addr}"))?;
    info!(addr = %listener.local_addr()?, "accepting consoles");

    for conn in listener.incoming() {
        let stream = match conn {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "couldn't accept console");
                continue;
            }
        };
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let prompt = prompt.to_owned();

        // One interpreter per connection, each on its own thread.
        thread::spawn(move || {
            info!(%peer, "console opened");
            match session(stream, &prompt) {
                Ok(()) => info!(%peer, "console closed"),
                Err(e) => warn!(%peer, error = %e, "console ended"),
            }
        });
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Args = argh::from_env();
    match args.listen {
        Some(addr) => serve(&addr, &args.prompt),
        None => console(&args.prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};

    #[test]
    fn test_hello_asks_for_name() {
        assert_eq!(hello(&[]).output, "What's your name?\n");
        let args = ["Ada".to_string(), "Lovelace".to_string()];
        assert_eq!(hello(&args).output, "Hello, Ada Lovelace\n");
    }

    #[test]
    fn test_finish_treats_eof_as_success() {
        assert!(finish(linecmd::Error::Eof).is_ok());
        assert!(finish(linecmd::Error::Handler(anyhow::anyhow!("oops"))).is_err());
    }

    #[test]
    fn test_session_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            session(stream, "% ")
        });

        let mut client = TcpStream::connect(addr).unwrap();
        let mut reader = BufReader::new(client.try_clone().unwrap());
        client.write_all(b"hello Ada\nhello\n").unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut transcript = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            transcript.push_str(&line);
        }
        assert_eq!(transcript, "% Hello, Ada\n% What's your name?\n% ");
        assert!(server.join().unwrap().is_ok());
    }
}
