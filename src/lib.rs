//! Lowers typed, tree-shaped programs (modules of functions of nested instructions)
//! into WebAssembly binaries.

pub mod settings;

pub mod compiler_frontend {
    pub mod compiler_messages {
        pub mod compiler_dev_logging;
        pub mod compiler_errors;
    }

    pub mod typed_ir {
        pub mod decode;
        pub mod display;
        pub mod nodes;
    }
}

pub mod backends {
    pub mod wasm;
}

pub use backends::wasm::encode::{generate_module_wasm, generate_wasm, generate_wasm_from_json};
pub use compiler_frontend::compiler_messages::compiler_errors::{
    CompilerError, ErrorMetaDataKey, ErrorType,
};
pub use compiler_frontend::typed_ir::nodes::{Function, Instruction, MathOp, Module, ValueType};
pub use settings::CodegenConfig;
