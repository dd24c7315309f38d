#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Contact form mail relay

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use contact_mail_relay::{
    domain::{communication::smtp::RelaySettings, contact::ContactServiceImpl},
    infrastructure::{
        email::smtp::{SmtpMailer, SmtpSettings},
        http::{cors::CorsConfig, router, state::AppState, HttpServer, HttpServerConfig},
    },
};
use tracing::warn;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The CORS configuration
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// The SMTP relay settings
    #[clap(flatten)]
    pub smtp: SmtpSettings,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if let Err(err) = args.smtp.resolve() {
        warn!(error = %err, "contact requests will fail until the SMTP settings are complete");
    }

    let contacts = ContactServiceImpl::new(args.smtp, Arc::new(SmtpMailer::new()));
    let router = router(AppState::new(contacts), args.cors.allow_origin()?);

    HttpServer::new(router, &args.server)?.run().await
}
