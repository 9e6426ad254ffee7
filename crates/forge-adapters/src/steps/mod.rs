//! Steps de la build sintética, listos para agregar a un `ChainBuilder`.

mod assemble;
mod generate;
mod init;
mod scan;

pub use assemble::assemble_artifact;
pub use generate::{generate_config_code, generate_rest_endpoints};
pub use init::register_beans;
pub use scan::scan_sources;

use forge_core::ChainBuilder;

/// Agrega la cadena de demostración completa al builder.
pub fn install_demo_steps(builder: &mut ChainBuilder) {
    builder.add_step(scan_sources());
    builder.add_step(generate_rest_endpoints());
    builder.add_step(generate_config_code());
    builder.add_step(register_beans());
    builder.add_step(assemble_artifact());
}
