#[macro_use]
extern crate rocket;

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod request_logger;
pub mod routes;

use std::sync::{Arc, Once};

use crate::auth::{AdminStore, AuthConfig, AuthState, JwtService, PasswordService};
use crate::db::SiteDb;
use crate::request_logger::RequestLogger;
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use rocket_okapi::{
    openapi_get_routes,
    rapidoc::{GeneralConfig, HideShowConfig, RapiDocConfig, make_rapidoc},
    settings::UrlObject,
    swagger_ui::{SwaggerUIConfig, make_swagger_ui},
};

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

pub fn rocket() -> Rocket<Build> {
    init_logger();

    // Configure CORS
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Patch,
            ]
            .into_iter()
            .map(From::from)
            .collect(),
        )
        .allow_credentials(true)
        .to_cors()
        .expect("Error creating CORS");

    rocket::build()
        .attach(RequestLogger)
        .attach(SiteDb::init())
        .attach(cors)
        // Run database migrations on startup
        .attach(AdHoc::try_on_ignite(
            "Run Migrations",
            |rocket| async move {
                match SiteDb::fetch(&rocket) {
                    Some(db) => {
                        let pool = (**db).clone();
                        match db::run_migrations(&pool).await {
                            Ok(_) => {
                                log::info!("database migrations successful");
                                Ok(rocket)
                            }
                            Err(e) => {
                                log::error!("database migrations failed: {}", e);
                                Err(rocket)
                            }
                        }
                    }
                    None => {
                        log::error!("database pool not available for migrations");
                        Err(rocket)
                    }
                }
            },
        ))
        // Construct the auth stack once and hand copies of the pool to it,
        // rather than reaching for a global connection anywhere.
        .attach(AdHoc::try_on_ignite("Auth State", |rocket| async move {
            let pool = match SiteDb::fetch(&rocket) {
                Some(db) => (**db).clone(),
                None => {
                    log::error!("database pool not available for auth state");
                    return Err(rocket);
                }
            };

            let config = match AuthConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    log::error!("auth configuration error: {}", e);
                    return Err(rocket);
                }
            };

            let passwords = match PasswordService::new() {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    log::error!("failed to initialize password hashing: {}", e);
                    return Err(rocket);
                }
            };

            let jwt_service = match JwtService::from_config(&config) {
                Ok(service) => service,
                Err(e) => {
                    log::error!("failed to initialize jwt service: {}", e);
                    return Err(rocket);
                }
            };

            let store = AdminStore::new(pool, passwords);
            let auth_state = AuthState::new(config, jwt_service, store);

            Ok(rocket.manage(auth_state))
        }))
        .mount(
            "/api/v1",
            openapi_get_routes![
                // Health routes
                routes::health::health_check,
                // Admin console routes
                auth::routes::login,
                auth::routes::get_profile,
                auth::routes::update_profile,
                auth::routes::change_password,
                auth::routes::create_admin,
                auth::routes::list_admins,
                // Blog / case-study routes
                routes::blog::list_blogs,
                routes::blog::list_all_blogs,
                routes::blog::get_blog,
                routes::blog::create_blog,
                routes::blog::update_blog,
                routes::blog::delete_blog,
                // Contact routes
                routes::contact::submit_contact,
                routes::contact::list_contacts,
                routes::contact::update_contact_status,
                // Services routes
                routes::services::list_services,
                routes::services::get_service,
                routes::services::create_service,
                routes::services::update_service,
                routes::services::delete_service,
                // Stats routes
                routes::stats::get_stats,
                routes::stats::update_stats,
                // Testimonial routes
                routes::testimonials::list_testimonials,
                routes::testimonials::list_all_testimonials,
                routes::testimonials::create_testimonial,
                routes::testimonials::update_testimonial,
                routes::testimonials::delete_testimonial,
            ],
        )
        .register(
            "/",
            catchers![
                routes::catchers::bad_request,
                routes::catchers::unauthorized,
                routes::catchers::forbidden,
                routes::catchers::not_found,
                routes::catchers::unprocessable,
                routes::catchers::internal_error,
            ],
        )
        .mount(
            "/api/docs/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../../v1/openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/docs/rapidoc/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("Consultancy API", "../../v1/openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket, Route};
    use sqlx::PgPool;

    use crate::auth::responses::Role;
    use crate::auth::{AdminStore, AuthConfig, AuthState, JwtService, PasswordService};

    pub use database::{TestDatabase, TestDatabaseError};

    /// Build an [`AuthState`] with fixed test configuration over the given
    /// pool. A negative `token_ttl_secs` mints already-expired tokens.
    pub fn test_auth_state(pool: &PgPool, token_ttl_secs: i64) -> AuthState {
        let config = AuthConfig {
            issuer: "http://localhost".into(),
            audience: "consultancy-api".into(),
            token_ttl_secs,
            jwt_secret: "integration-test-secret".into(),
        };
        let passwords =
            std::sync::Arc::new(PasswordService::new().expect("password service"));
        let jwt_service = JwtService::from_config(&config).expect("jwt service");
        let store = AdminStore::new(pool.clone(), passwords);
        AuthState::new(config, jwt_service, store)
    }

    /// Convenience helpers for seeding rows in integration tests.
    pub struct TestFixtures<'a> {
        pool: &'a PgPool,
    }

    impl<'a> TestFixtures<'a> {
        /// Create a fixture helper bound to the provided pool.
        pub fn new(pool: &'a PgPool) -> Self {
            Self { pool }
        }

        /// Insert an administrator row, returning the new id.
        pub async fn insert_admin(
            &self,
            username: &str,
            email: &str,
            password_hash: &str,
            role: Role,
            is_active: bool,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO admins (username, name, email, password_hash, role, is_active) \
                 VALUES ($1, $1, lower($2), $3, $4, $5) RETURNING id",
            )
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .bind(is_active)
            .fetch_one(self.pool)
            .await
        }

        /// Soft-disable an administrator account.
        pub async fn deactivate_admin(&self, id: i32) -> Result<(), sqlx::Error> {
            sqlx::query("UPDATE admins SET is_active = FALSE WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;
            Ok(())
        }

        /// Insert a blog row for listing/filtering assertions.
        pub async fn insert_blog(
            &self,
            title: &str,
            is_active: bool,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO blogs (title, summary, content, is_active) \
                 VALUES ($1, 'summary', 'content', $2) RETURNING id",
            )
            .bind(title)
            .bind(is_active)
            .fetch_one(self.pool)
            .await
        }
    }

    pub mod database {
        use testcontainers::runners::AsyncRunner;
        use testcontainers::{ContainerAsync, core::error::TestcontainersError};
        use testcontainers_modules::postgres::Postgres;
        use thiserror::Error;

        use sqlx::PgPool;
        use sqlx::postgres::PgPoolOptions;

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("database error: {0}")]
            Sqlx(#[from] sqlx::Error),
            #[error("migration error: {0}")]
            Migration(#[from] sqlx::migrate::MigrateError),
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
        }

        /// Ephemeral database factory for integration tests: one disposable
        /// Postgres container per test, migrated and ready.
        pub struct TestDatabase {
            pool: Option<PgPool>,
            url: String,
            container: Option<ContainerAsync<Postgres>>,
        }

        impl TestDatabase {
            /// Provision a fresh database by launching a disposable
            /// Postgres container and running migrations against it.
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let container = Postgres::default().start().await?;

                let host = container.get_host().await?.to_string();
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&url)
                    .await?;

                crate::db::run_migrations(&pool).await?;

                Ok(Self {
                    pool: Some(pool),
                    url,
                    container: Some(container),
                })
            }

            /// Connection string for wiring the Rocket database fairing.
            pub fn url(&self) -> &str {
                &self.url
            }

            /// Cloneable connection pool for use in tests and Rocket state.
            pub fn pool(&self) -> &PgPool {
                self.pool.as_ref().expect("test database pool is available")
            }

            /// Convenience method returning a clone of the pooled handle.
            pub fn pool_clone(&self) -> PgPool {
                self.pool().clone()
            }

            /// Close pool connections and tear the container down.
            pub async fn close(mut self) -> Result<(), TestDatabaseError> {
                if let Some(pool) = self.pool.take() {
                    pool.close().await;
                }
                if let Some(container) = self.container.take() {
                    drop(container);
                }
                Ok(())
            }
        }
    }

    /// Builder for constructing Rocket instances tailored for integration
    /// tests: random port, logging off, envelope catchers registered.
    #[derive(Default)]
    pub struct TestRocketBuilder {
        figment: Figment,
        mounts: Vec<(String, Vec<Route>)>,
        auth_state: Option<AuthState>,
        attach_site_db: bool,
    }

    impl TestRocketBuilder {
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                mounts: Vec::new(),
                auth_state: None,
                attach_site_db: false,
            }
        }

        /// Attach the `SiteDb` pool fairing pointed at the given database,
        /// for tests exercising routes that take a `Connection<SiteDb>`.
        pub fn with_site_db(mut self, url: &str) -> Self {
            self.figment = self
                .figment
                .merge(("databases.consultancy_db.url", url.to_string()));
            self.attach_site_db = true;
            self
        }

        /// Mount routes under `/api/v1`.
        pub fn mount_api_routes(mut self, routes: Vec<Route>) -> Self {
            self.mounts.push(("/api/v1".to_string(), routes));
            self
        }

        /// Manage an `AuthState` for tests exercising protected routes.
        pub fn manage_auth_state(mut self, state: AuthState) -> Self {
            self.auth_state = Some(state);
            self
        }

        /// Finish building the Rocket instance.
        pub fn build(self) -> Rocket<Build> {
            let mut rocket = rocket::custom(self.figment).register(
                "/",
                rocket::catchers![
                    crate::routes::catchers::bad_request,
                    crate::routes::catchers::unauthorized,
                    crate::routes::catchers::forbidden,
                    crate::routes::catchers::not_found,
                    crate::routes::catchers::unprocessable,
                    crate::routes::catchers::internal_error,
                ],
            );

            if self.attach_site_db {
                use rocket_db_pools::Database;
                rocket = rocket.attach(crate::db::SiteDb::init());
            }

            for (base, routes) in self.mounts {
                rocket = rocket.mount(base, routes);
            }

            if let Some(state) = self.auth_state {
                rocket = rocket.manage(state);
            }

            rocket
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}
