pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Service",
        description = "E-commerce storefront and blog management API"
    ),
    paths(
        handlers::products::index,
        handlers::products::by_category,
        handlers::products::search,
        handlers::products::newest,
        handlers::products::featured,
        handlers::products::detail,
        handlers::products::create,
        handlers::products::update,
        handlers::products::change_status,
        handlers::products::delete,
        handlers::categories::index,
        handlers::categories::detail,
        handlers::categories::create,
        handlers::categories::edit,
        handlers::categories::delete,
        handlers::cart::index,
        handlers::cart::add,
        handlers::cart::update,
        handlers::cart::remove,
        handlers::blogs::index,
        handlers::blogs::featured,
        handlers::blogs::detail,
        handlers::blogs::create,
        handlers::blogs::edit,
        handlers::blogs::change_status,
        handlers::blogs::delete,
        handlers::blog_categories::index,
        handlers::blog_categories::create,
        handlers::blog_categories::edit,
        handlers::blog_categories::delete,
        handlers::invoices::index,
        handlers::invoices::create,
        handlers::invoices::edit,
        handlers::invoices::delete,
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/products")
                    .route("", web::get().to(handlers::products::index))
                    .route("/search", web::get().to(handlers::products::search))
                    .route("/new", web::get().to(handlers::products::newest))
                    .route("/featured", web::get().to(handlers::products::featured))
                    .route("/detail/{id}", web::get().to(handlers::products::detail))
                    .route(
                        "/category/{category_id}",
                        web::get().to(handlers::products::by_category),
                    )
                    .route("/create", web::post().to(handlers::products::create))
                    .route("/update/{id}", web::patch().to(handlers::products::update))
                    .route(
                        "/change-status/{status}/{id}",
                        web::patch().to(handlers::products::change_status),
                    )
                    .route("/delete/{id}", web::delete().to(handlers::products::delete)),
            )
            .service(
                web::scope("/category")
                    .route("", web::get().to(handlers::categories::index))
                    .route("/detail/{id}", web::get().to(handlers::categories::detail))
                    .route("/create", web::post().to(handlers::categories::create))
                    .route("/edit/{id}", web::patch().to(handlers::categories::edit))
                    .route(
                        "/delete/{id}",
                        web::delete().to(handlers::categories::delete),
                    ),
            )
            .service(
                web::scope("/cart")
                    .route("", web::get().to(handlers::cart::index))
                    .route("/add/{product_id}", web::post().to(handlers::cart::add))
                    .route(
                        "/update/{product_id}",
                        web::patch().to(handlers::cart::update),
                    )
                    .route(
                        "/delete/{product_id}",
                        web::delete().to(handlers::cart::remove),
                    ),
            )
            .service(
                web::scope("/blog")
                    .route("", web::get().to(handlers::blogs::index))
                    .route("/featured", web::get().to(handlers::blogs::featured))
                    .route("/detail/{id}", web::get().to(handlers::blogs::detail))
                    .route("/create", web::post().to(handlers::blogs::create))
                    .route("/edit/{id}", web::patch().to(handlers::blogs::edit))
                    .route(
                        "/change-status/{status}/{id}",
                        web::patch().to(handlers::blogs::change_status),
                    )
                    .route("/delete/{id}", web::delete().to(handlers::blogs::delete)),
            )
            .service(
                web::scope("/category-blog")
                    .route("", web::get().to(handlers::blog_categories::index))
                    .route(
                        "/create",
                        web::post().to(handlers::blog_categories::create),
                    )
                    .route(
                        "/edit/{id}",
                        web::patch().to(handlers::blog_categories::edit),
                    )
                    .route(
                        "/delete/{id}",
                        web::delete().to(handlers::blog_categories::delete),
                    ),
            )
            .service(
                web::scope("/invoices")
                    .route("", web::get().to(handlers::invoices::index))
                    .route("/create", web::post().to(handlers::invoices::create))
                    .route("/edit/{id}", web::patch().to(handlers::invoices::edit))
                    .route(
                        "/delete/{id}",
                        web::delete().to(handlers::invoices::delete),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
