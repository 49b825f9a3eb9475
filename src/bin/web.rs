use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;

use http_body::Limited;
use hyper::Body as HyperBody;
use tokio::runtime::Builder as RuntimeBuilder;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use fieldmart::api::web::route_table;
use fieldmart::confidentiality;
use fieldmart::constant::EXPECTED_ENV_VAR_LABELS;
use fieldmart::logging::{app_log_event, AppLogContext, AppLogLevel};
use fieldmart::network::{app_web_service, middleware, net_server_listener};
use fieldmart::{AppConfig, AppSharedState};

type AppFinalHttpBody = Limited<HyperBody>;

async fn start_server(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    let routes = route_table::<AppFinalHttpBody>();
    let listener = &cfg.api_server.listen;
    let (service, num_applied) = app_web_service::<AppFinalHttpBody>(listener, routes, shr_state);
    if num_applied == 0 {
        app_log_event!(
            log_ctx_p,
            AppLogLevel::ERROR,
            "no route created, web API server failed to start"
        );
        return;
    }
    let result = net_server_listener(listener.host.clone(), listener.port);
    match result {
        Ok(b) => {
            let ratelm = middleware::rate_limit(listener.max_connections);
            let reqlm = middleware::req_body_limit(cfg.api_server.limit_req_body_in_bytes);
            let co = match middleware::cors(
                cfg.basepath.system.clone() + "/" + listener.cors.as_str(),
            ) {
                Ok(v) => v,
                Err(e) => {
                    app_log_event!(
                        log_ctx_p,
                        AppLogLevel::ERROR,
                        "cors layer init error, detail: {:?}",
                        e
                    );
                    CorsLayer::new()
                }
            };
            let middlewares1 = ServiceBuilder::new().layer(reqlm).layer(co);
            let service = service.layer(middlewares1);
            let middlewares2 = ServiceBuilder::new()
                .layer(ratelm) // rate-limit layer cannot be cloned
                .service(service.into_make_service());
            let sr = b.serve(middlewares2);
            let _ = sr.await;
            app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server terminating");
        }
        Err(e) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "API server failed to start, {} ",
                e
            );
        }
    }
} // end of fn start_server

fn start_async_runtime(shr_state: AppSharedState) {
    let cfg = shr_state.config();
    let log_ctx = shr_state.log_context().clone();
    let log_ctx2 = log_ctx.clone();
    let stack_nbytes: usize = (cfg.api_server.stack_sz_kb as usize) << 10;
    let result = RuntimeBuilder::new_multi_thread()
        .worker_threads(cfg.api_server.num_workers as usize)
        .on_thread_start(move || {
            // all variables moved into this closure have to be clonable,
            // the closure runs once for every spawned worker
            let log_cpy = log_ctx.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker started");
        })
        .on_thread_stop(move || {
            let log_cpy = log_ctx2.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker terminating");
        })
        .thread_stack_size(stack_nbytes)
        .thread_name("web-api-worker")
        // manage low-level I/O drivers used by network types
        .enable_io()
        // rate limiter in crate `tower` requires the timer in the runtime
        .enable_time()
        .build();
    match result {
        Ok(rt) => {
            rt.block_on(async move {
                start_server(shr_state).await;
            });
        }
        Err(e) => {
            println!("async runtime failed to build, {} ", e);
        }
    };
} // end of fn start_async_runtime

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_ENV_VAR_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    match AppConfig::new(arg_map) {
        Ok(cfg) => match confidentiality::build_context(&cfg) {
            Ok(confidential) => {
                let log_ctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
                match AppSharedState::new(cfg, log_ctx, confidential) {
                    Ok(shr_state) => start_async_runtime(shr_state),
                    Err(e) => {
                        println!("app failed to init shared state, error: {} ", e);
                    }
                }
            }
            Err(e) => {
                println!("app failed to init confidentiality handler, error code: {} ", e);
            }
        },
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
        }
    };
} // end of main
