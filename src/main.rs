//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (o login é público; /me exige sessão)
    let auth_routes = Router::new()
        .route("/google", post(handlers::auth::google_login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Painel admin: tudo atrás do auth_guard (e cada handler exige papel
    // ADMIN/SUPER_ADMIN via extrator)
    let admin_routes = Router::new()
        .route("/leads", get(handlers::leads::list_leads))
        .route(
            "/leads/{id}",
            get(handlers::leads::get_lead).patch(handlers::leads::update_lead_status),
        )
        .route("/leads/{id}/email", post(handlers::leads::send_lead_email))
        .route(
            "/allowed-admins",
            get(handlers::admins::list_allowed_admins).post(handlers::admins::add_allowed_admin),
        )
        .route(
            "/allowed-admins/{id}",
            delete(handlers::admins::remove_allowed_admin),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/contact", post(handlers::contact::submit_contact))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
