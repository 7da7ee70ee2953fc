pub mod api;
pub mod websocket;

use crate::catalog::service::CatalogService;
use crate::cli::Args;
use crate::transcript::ReplyDelay;
use api::AppState;
use websocket::ChatContext;
use std::error::Error;

pub struct Server {
    addr: String,
    catalog: CatalogService,
    args: Args,
}

impl Server {
    pub fn new(addr: String, catalog: CatalogService, args: Args) -> Self {
        Self {
            addr,
            catalog,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(http_port) = self.args.http_port {
            self.start_http_server(http_port).await?;
        }

        self.start_ws_server().await?;

        Ok(())
    }

    async fn start_http_server(&self, http_port: u16) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(http_port, AppState {
            catalog: self.catalog.clone(),
            contact_link: self.args.contact_link.clone(),
        }).await
    }

    async fn start_ws_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        websocket::start_ws_server(&self.addr, ChatContext {
            catalog: self.catalog.shared().clone(),
            delay: ReplyDelay::new(self.args.reply_delay_min_ms, self.args.reply_delay_max_ms),
            contact_link: self.args.contact_link.clone(),
        }).await
    }
}
