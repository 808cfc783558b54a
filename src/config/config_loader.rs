use anyhow::{Ok, Result};

use super::config_model::{AuthSecret, DotEnvyConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let order_service = super::config_model::OrderService {
        base_url: std::env::var("ORDER_SERVICE_BASE_URL")
            .expect("ORDER_SERVICE_BASE_URL is invalid"),
        api_key: std::env::var("ORDER_SERVICE_API_KEY")
            .expect("ORDER_SERVICE_API_KEY is invalid"),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        order_service,
    })
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        jwt_secret: std::env::var("JWT_ADMIN_SECRET").expect("JWT_ADMIN_SECRET is invalid"),
    })
}
