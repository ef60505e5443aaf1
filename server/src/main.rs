#[tokio::main]
async fn main() {
    if let Err(e) = menu_ingest_server::start_server().await {
        eprintln!("menu-ingest-server: {e}");
        std::process::exit(1);
    }
}
