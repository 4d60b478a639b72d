use sendy_mock_server::Format;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let format = match std::env::var("SENDY_MOCK_FORMAT").as_deref() {
        Ok("html") => Format::Html,
        _ => Format::Plain,
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}, answering in {format:?} format");
    sendy_mock_server::run(listener, format).await
}
