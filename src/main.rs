use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::{Config, Environment, File};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;

use pushkind_promptbook::db::establish_connection_pool;
use pushkind_promptbook::models::config::{ServerConfig, StorageBackend};
use pushkind_promptbook::repository::{DieselRepository, JsonFileRepository, SnapshotStore};
use pushkind_promptbook::routes::{auth, categories, entries, materials, story};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

fn open_store(config: &ServerConfig) -> Result<Arc<dyn SnapshotStore>, String> {
    match config.storage {
        StorageBackend::Sqlite => {
            let pool = establish_connection_pool(&config.database_url)
                .map_err(|e| format!("failed to open {}: {e}", config.database_url))?;
            let mut conn = pool.get().map_err(|e| e.to_string())?;
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| format!("migrations failed: {e}"))?;
            log::info!("Using SQLite store at {}", config.database_url);
            Ok(Arc::new(DieselRepository::new(pool)))
        }
        StorageBackend::Json => {
            let repo = JsonFileRepository::open(&config.json_path)
                .map_err(|e| format!("failed to open {}: {e}", config.json_path))?;
            log::info!("Using JSON store at {}", repo.path().display());
            Ok(Arc::new(repo))
        }
    }
}

fn session_key(secret: &str) -> Key {
    if secret.is_empty() {
        log::warn!("No secret_key configured, sessions will not survive a restart");
        return Key::generate();
    }
    match Key::try_from(secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("secret_key is unusable ({e}), generating a random one");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let store = match open_store(&server_config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open store: {e}");
            std::process::exit(1);
        }
    };
    let store: web::Data<dyn SnapshotStore> = web::Data::from(store);
    let secret_key = session_key(&server_config.secret_key);

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(store.clone())
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(categories::list_categories)
            .service(categories::add_category)
            .service(categories::rename_category)
            .service(categories::remove_category)
            // static segments before `{id}`
            .service(entries::search_entries)
            .service(entries::list_entries)
            .service(entries::create_entry)
            .service(entries::get_entry)
            .service(entries::update_entry)
            .service(entries::delete_entry)
            .service(story::get_story)
            .service(story::story_timeline)
            .service(story::set_story_meta)
            .service(story::add_scene)
            .service(story::add_scene_from_entry)
            .service(story::update_scene)
            .service(story::delete_scene)
            .service(story::set_scene_done)
            .service(story::move_scene)
            .service(materials::search_materials)
            .service(materials::list_materials)
            .service(materials::create_material)
            .service(materials::delete_material)
    })
    .bind(bind_address)?
    .run()
    .await
}
