use anyhow::Context;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    reservation_form_server::run()
        .await
        .context("registration form server exited with an error")
}
