use std::io::Write;

use hearth::config::Config;
use hearth::http::request::{Method, Request};
use hearth::http::response::{Response, ResponseBuilder, StatusCode};
use hearth::http::writer::ResponseSink;
use hearth::server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = Server::new(cfg);

    server.add_handler(Method::GET, "/messages", list_messages);
    server.add_handler(Method::POST, "/messages", post_message);

    tokio::select! {
        res = server.listen() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn list_messages(req: &Request, sink: &mut ResponseSink) -> anyhow::Result<()> {
    let last = req.query_param("last").unwrap_or("all");
    sink.send(
        &ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body(format!("messages: {}\n", last).into_bytes())
            .build(),
    );
    Ok(())
}

fn post_message(req: &Request, sink: &mut ResponseSink) -> anyhow::Result<()> {
    let mut body = Vec::new();

    if let Some(fields) = req.post_params() {
        for (name, values) in fields.iter() {
            writeln!(body, "{} = {}", name, values.join(", "))?;
        }
    }
    if let Some(parts) = req.parts() {
        for (name, parts) in parts.iter() {
            for part in parts {
                match &part.file_name {
                    Some(file) => {
                        writeln!(body, "{}: file {} ({} bytes)", name, file, part.body.len())?
                    }
                    None => {
                        writeln!(body, "{} = {}", name, part.text().unwrap_or("<binary>"))?
                    }
                }
            }
        }
    }

    sink.send(&Response::content("text/plain", body));
    Ok(())
}
