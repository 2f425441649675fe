//! # WASM Codegen Module
//!
//! Lowers typed IR modules into a WebAssembly binary using the wasm_encoder library.
//!
//! ## Pipeline
//!
//! ```text
//! Module → Function → body Instruction → Machine IR → Module Builder → WASM Bytes
//!            ↓              ↓                ↓              ↓              ↓
//!        Signature     Lowering         Label depths    Type dedup      Emission
//!        Locals        (post-order)     Opcodes         Registration    Validation (opt.)
//! ```
//!
//! ## Core Components
//!
//! ### 1. Type Mapper (`type_mapper.rs`)
//! Fixed table from source value types to machine types.
//!
//! ### 2. Instruction Lowerer (`instruction_lowerer.rs`)
//! Recursive, order-preserving conversion of instruction trees into machine IR.
//! Uses the Control Flow Manager (`control_flow.rs`) to resolve break labels.
//!
//! ### 3. Function Assembler (`function_assembler.rs`)
//! Signature, locals and body of one function, registered under
//! `module_name + function_name`.
//!
//! ### 4. Module Assembler (`module_assembler.rs`)
//! Assembles a module's functions in declaration order.
//!
//! ### 5. Module Emitter (`emitter.rs`)
//! Consumes the Module Builder (`module_builder.rs`) and writes the binary.
//!
//! ## Error Handling
//!
//! Lowering fails with one of four kinds: NotFound, NotImplemented, TypeMismatch and
//! Unreachable (`error.rs`). The first failure aborts the whole request. No partial
//! binary is ever returned.
//!
//! ## Usage Example
//!
//! ```rust
//! use wasm_lowering::{CodegenConfig, Function, Instruction, MathOp, Module, ValueType, generate_wasm};
//!
//! let module = Module::new("m").with_function(Function {
//!     name: "f".to_string(),
//!     params: vec![],
//!     return_type: ValueType::Int32,
//!     locals: vec![],
//!     body: Instruction::binary(
//!         MathOp::Add,
//!         ValueType::Int32,
//!         Instruction::ConstInt32(2),
//!         Instruction::ConstInt32(3),
//!     ),
//! });
//!
//! let wasm_bytes = generate_wasm(&[module], &CodegenConfig::default()).unwrap();
//! assert_eq!(&wasm_bytes[0..4], b"\0asm");
//! ```

pub mod control_flow;
pub mod emitter;
pub mod encode;
pub mod error;
pub mod function_assembler;
pub mod instruction_lowerer;
pub mod machine_ir;
pub mod module_assembler;
pub mod module_builder;
pub mod type_mapper;
pub mod validator;
