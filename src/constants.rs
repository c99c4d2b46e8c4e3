//! Application constants and configuration

pub const API_BASE_URL: &str = "https://api.escuelajs.co/api/v1";
pub const CATEGORIES_URL: &str = "https://api.escuelajs.co/api/v1/categories";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// User-facing messages (the service and its audience are Spanish-language)
pub const MSG_FIELDS_REQUIRED: &str = "Todos los campos son obligatorios";
pub const MSG_ADDED: &str = "Categoría agregada exitosamente";
pub const MSG_EDITED: &str = "Categoría editada exitosamente";
pub const MSG_DELETED: &str = "La categoría ha sido eliminada";
pub const MSG_CONFIRM_TITLE: &str = "¿Estás seguro?";
pub const MSG_CONFIRM_BODY: &str = "No podrás revertir esta acción";
pub const MSG_CONFIRM_YES: &str = "Sí, eliminar";
pub const MSG_CANCEL: &str = "Cancelar";
