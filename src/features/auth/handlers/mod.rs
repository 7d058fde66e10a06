pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_logout, __path_refresh_token, get_me, login, logout,
    refresh_token,
};
