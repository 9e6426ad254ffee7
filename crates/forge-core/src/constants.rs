//! Constantes del motor core.
//!
//! Este módulo agrupa valores estáticos que participan en el cálculo de
//! fingerprints y en la compatibilidad entre versiones del motor. Cambios en
//! estas constantes pueden afectar la reproducibilidad si forman parte del
//! input del hashing (por diseño, `ENGINE_VERSION` sí lo es).

/// Versión lógica del motor de cadenas. Se incluye en el input de los
/// fingerprints de steps y del run completo para que un cambio de versión
/// del engine invalide determinísticamente los fingerprints aunque la
/// definición y los datos no cambien.
pub const ENGINE_VERSION: &str = "FORGE-1.0";
