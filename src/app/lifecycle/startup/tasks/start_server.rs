use crate::app::dispatch::{Dispatcher, configure, log_requests};
use crate::app::lifecycle::context::ServerContext;
use crate::app::lifecycle::pipeline::AsyncTask;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Compress, from_fn};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Error, anyhow};
use async_trait::async_trait;
use tracing::{error, info, instrument};

/// The served application: routes, request logging and response compression
pub fn build_app(
    dispatcher: web::Data<Dispatcher>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(dispatcher)
        .wrap(Compress::default())
        .wrap(from_fn(log_requests))
        .configure(configure)
}

pub struct StartServerTask;

#[async_trait]
impl AsyncTask<ServerContext, Error> for StartServerTask {
    #[instrument(skip_all, name = "start_server_task")]
    async fn run(&self, ctx: &ServerContext) -> Result<(), Error> {
        let config = ctx
            .config
            .get()
            .ok_or_else(|| anyhow!("Server pipeline context missing config!"))?;

        let store = ctx
            .store
            .get()
            .ok_or_else(|| anyhow!("Store not initialized before server start"))?
            .clone();

        let dispatcher = web::Data::new(Dispatcher::new(store));

        let server = HttpServer::new(move || build_app(dispatcher.clone()))
            .bind(&config.address)
            .with_context(|| format!("failed to bind {}", config.address))?
            .disable_signals()
            .run();

        ctx.server
            .set(server.handle())
            .map_err(|_| anyhow!("Could not set server"))?;

        actix_web::rt::spawn(async move {
            if let Err(e) = server.await {
                error!("Http server failed: {}", e);
            }
        });

        info!(address = %config.address, "Started http server, ready for requests");

        Ok(())
    }
}
