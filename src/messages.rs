//! User-facing messages. The editor's audience reads Spanish, so every string
//! that can reach the browser lives here.

pub const STORE_NOT_CONFIGURED: &str = "La base de datos no está configurada.";
pub const ADMIN_NOT_CONFIGURED: &str = "Faltan las credenciales de administración.";
pub const NOT_AUTHENTICATED: &str = "Usuario no autenticado.";
pub const MISSING_SYLLABUS_ID: &str = "Se requiere el ID del plan de estudios.";
pub const MISSING_SAVE_IDS: &str = "Falta el ID del plan de estudios o del usuario.";
pub const INVALID_BODY: &str = "El cuerpo de la solicitud no es válido.";
pub const ID_MISMATCH: &str = "El ID del plan de estudios no coincide con la ruta.";
pub const MISSING_NEW_OWNER: &str = "Se requiere el ID del nuevo propietario.";
pub const OWNER_CHANGE_REJECTED: &str =
    "No se puede cambiar el propietario del plan de estudios al guardar.";
pub const NO_VIEW_PERMISSION: &str = "No tiene permiso para ver este plan de estudios.";
pub const ADMIN_ONLY: &str = "Esta acción solo está disponible para administradores.";
pub const NOT_FOUND: &str = "Plan de estudios no encontrado.";
pub const UNIT_NOT_FOUND: &str = "La unidad de aprendizaje indicada no existe.";
pub const STORE_PERMISSION_DENIED: &str =
    "La base de datos rechazó la operación por falta de permisos.";
pub const STORE_FAILURE: &str = "Ocurrió un error con la base de datos. Por favor, inténtelo de nuevo.";
pub const UPSTREAM_FAILURE: &str = "Ocurrió un error inesperado. Por favor, inténtelo de nuevo.";

pub const EMPTY_REFERENCE: &str = "El campo de referencia no puede estar vacío.";
pub const VALIDATION_FAILED: &str =
    "Ocurrió un error al validar la referencia. Por favor, inténtelo de nuevo.";

pub const DEFAULT_COURSE_NAME: &str = "Nuevo Plan de Estudio";
pub const DEFAULT_COURSE_KEY: &str = "CURSO-101";

pub fn unit_label(position: usize) -> String {
    format!("Unidad de Aprendizaje {}", position)
}

pub fn invalid_unit_dates(position: usize) -> String {
    format!(
        "La fecha de inicio de la Unidad {} es posterior a su fecha de término.",
        position
    )
}

pub fn weight_total_warning(total: f64) -> String {
    format!(
        "La suma de las ponderaciones es {}%, debería ser 100%.",
        format_weight(total)
    )
}

fn format_weight(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{}", total as i64)
    } else {
        format!("{:.2}", total)
    }
}
