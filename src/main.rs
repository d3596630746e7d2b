#[actix_web::main]
async fn main() -> std::io::Result<()> {
    mail_merge_server::run().await
}
