//! Catálogo de kinds de la build sintética.
//!
//! Ids estables: cambiarlos cambia el `definition_hash` de cualquier
//! cadena que los use.

use forge_core::{ChainBuildError, ChainBuilder, ItemKind};

/// Raíces de código fuente (inicial: las aporta quien invoca el run).
pub const SOURCE_ROOTS: &str = "source.roots";
/// Índice de clases derivado de las fuentes.
pub const CLASS_INDEX: &str = "class.index";
/// Fragmentos de código generado; cada step aporta los suyos.
pub const GENERATED_CODE: &str = "generated.code";
/// Descriptores de beans a registrar en la fase estática.
pub const BEAN_DEFINITIONS: &str = "bean.definitions";
/// Marcador: la configuración quedó congelada.
pub const CONFIG_FROZEN: &str = "config.frozen";
/// Artefacto final de la aplicación.
pub const APP_ARTIFACT: &str = "app.artifact";

/// Registra el catálogo completo y declara inicial/finales.
pub fn register(builder: &mut ChainBuilder) -> Result<(), ChainBuildError> {
    builder.register_kind(ItemKind::single(SOURCE_ROOTS))?
           .register_kind(ItemKind::single(CLASS_INDEX))?
           .register_kind(ItemKind::multi(GENERATED_CODE))?
           .register_kind(ItemKind::multi(BEAN_DEFINITIONS))?
           .register_kind(ItemKind::marker(CONFIG_FROZEN))?
           .register_kind(ItemKind::single(APP_ARTIFACT))?;
    builder.add_initial(SOURCE_ROOTS);
    builder.add_final(APP_ARTIFACT);
    Ok(())
}
