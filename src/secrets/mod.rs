mod token_store;

pub use token_store::{
    credentials_path, delete_credentials, get_credentials, store_credentials, TOKEN_ENV,
};
