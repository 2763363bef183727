#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    ordre_virement_server::run().await
}
