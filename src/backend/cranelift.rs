//! Cranelift code generation for the triangle routine
//!
//! Emits a single exported function:
//!
//! ```text
//! floyd(rows: i64, sink: ptr) -> i64
//! ```
//!
//! The routine keeps the row, column and counter in SSA variables and owns
//! the nested loop. It calls three imports:
//! - `floyd_emit_number(sink, n)` and `floyd_end_row(sink)` for output
//! - `env.increment(n)`, bound to whatever host function was resolved
//!
//! A non-zero status from either output stub ends the routine early, so no
//! further numbers are printed or incremented once the sink has failed.
//!
//! The return value is the counter after the last increment.

use cranelift::prelude::*;
use cranelift_codegen::ir::FuncRef;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{FuncId, Linkage, Module};
use std::collections::HashMap;
use tracing::debug;

use super::{BackendConfig, BackendError};
use crate::host::{HostFunction, IMPORT_MODULE, IMPORT_NAME};
use crate::triangle::FIRST_NUMBER;

/// Name of the compiled entry point.
pub const ENTRY_NAME: &str = "floyd";

/// Runtime stub symbols the routine links against.
pub const EMIT_NUMBER: &str = "floyd_emit_number";
pub const END_ROW: &str = "floyd_end_row";

/// Linker symbol for a host import `module.name`.
pub fn import_symbol(module: &str, name: &str) -> String {
    format!("{}.{}", module, name)
}

/// Imports as seen from inside the function being built
struct Imports {
    emit_number: FuncRef,
    end_row: FuncRef,
    increment: FuncRef,
}

/// Cranelift code generator for the triangle routine
pub struct FloydCodegen {
    /// The JIT module being built
    module: JITModule,
    /// Codegen context
    ctx: cranelift_codegen::Context,
    /// Function builder context
    builder_ctx: FunctionBuilderContext,
    /// Compiled function pointers
    compiled_funcs: HashMap<String, *const u8>,
}

impl FloydCodegen {
    /// Create a code generator whose `env.increment` import is bound to `increment`.
    pub fn new(config: &BackendConfig, increment: HostFunction) -> Result<Self, BackendError> {
        let mut flag_builder = settings::builder();

        let flags = [
            ("use_colocated_libcalls", "true"),
            ("is_pic", "false"),
            ("opt_level", config.opt_level.as_setting()),
            ("enable_verifier", if config.verify { "true" } else { "false" }),
        ];
        for (name, value) in flags {
            flag_builder.set(name, value).map_err(|e| {
                BackendError::Cranelift(format!("Failed to set {}={}: {}", name, value, e))
            })?;
        }

        let isa_builder = cranelift_native::builder()
            .map_err(|e| BackendError::Cranelift(format!("Failed to create ISA builder: {}", e)))?;

        let isa = isa_builder
            .finish(settings::Flags::new(flag_builder))
            .map_err(|e| BackendError::Cranelift(format!("Failed to create ISA: {}", e)))?;

        let mut builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
        Self::register_symbols(&mut builder, increment);

        let module = JITModule::new(builder);
        let ctx = module.make_context();

        Ok(Self {
            module,
            ctx,
            builder_ctx: FunctionBuilderContext::new(),
            compiled_funcs: HashMap::new(),
        })
    }

    /// Register runtime stubs and the host increment as symbols for the JIT
    fn register_symbols(builder: &mut JITBuilder, increment: HostFunction) {
        use crate::runtime::stubs::*;

        builder.symbol(EMIT_NUMBER, floyd_emit_number as *const u8);
        builder.symbol(END_ROW, floyd_end_row as *const u8);

        let symbol = import_symbol(IMPORT_MODULE, IMPORT_NAME);
        debug!(%symbol, "binding host import");
        builder.symbol(symbol, increment.as_ptr());
    }

    /// Declare an imported function taking `params` and returning one i64
    fn declare_import(&mut self, name: &str, params: &[Type]) -> Result<FuncId, BackendError> {
        let mut sig = self.module.make_signature();
        for ty in params {
            sig.params.push(AbiParam::new(*ty));
        }
        sig.returns.push(AbiParam::new(types::I64));

        self.module
            .declare_function(name, Linkage::Import, &sig)
            .map_err(|e| BackendError::Cranelift(format!("Failed to declare import {}: {}", name, e)))
    }

    /// Build, compile and finalize the `floyd` routine.
    pub fn compile(&mut self) -> Result<*const u8, BackendError> {
        if let Some(ptr) = self.get_func(ENTRY_NAME) {
            return Ok(ptr);
        }

        let ptr_ty = self.module.target_config().pointer_type();

        let mut sig = self.module.make_signature();
        sig.params.push(AbiParam::new(types::I64));
        sig.params.push(AbiParam::new(ptr_ty));
        sig.returns.push(AbiParam::new(types::I64));

        let func_id = self
            .module
            .declare_function(ENTRY_NAME, Linkage::Export, &sig)
            .map_err(|e| {
                BackendError::Cranelift(format!("Failed to declare function {}: {}", ENTRY_NAME, e))
            })?;

        let emit_id = self.declare_import(EMIT_NUMBER, &[ptr_ty, types::I64])?;
        let end_row_id = self.declare_import(END_ROW, &[ptr_ty])?;
        let increment_id =
            self.declare_import(&import_symbol(IMPORT_MODULE, IMPORT_NAME), &[types::I64])?;

        self.ctx.clear();
        self.ctx.func.signature = sig;

        {
            let mut builder = FunctionBuilder::new(&mut self.ctx.func, &mut self.builder_ctx);
            let imports = Imports {
                emit_number: self.module.declare_func_in_func(emit_id, builder.func),
                end_row: self.module.declare_func_in_func(end_row_id, builder.func),
                increment: self.module.declare_func_in_func(increment_id, builder.func),
            };
            translate_floyd(&mut builder, &imports);
            builder.finalize();
        }

        self.module
            .define_function(func_id, &mut self.ctx)
            .map_err(|e| {
                BackendError::Cranelift(format!("Failed to compile function {}: {}", ENTRY_NAME, e))
            })?;

        self.module
            .finalize_definitions()
            .map_err(|e| BackendError::Cranelift(format!("Failed to finalize: {}", e)))?;

        let ptr = self.module.get_finalized_function(func_id);
        self.compiled_funcs.insert(ENTRY_NAME.to_string(), ptr);
        debug!(function = ENTRY_NAME, "compiled native routine");

        Ok(ptr)
    }

    /// Get a compiled function by name
    pub fn get_func(&self, name: &str) -> Option<*const u8> {
        self.compiled_funcs.get(name).copied()
    }
}

/// Emit the body of `floyd(rows, sink)`
fn translate_floyd(builder: &mut FunctionBuilder, imports: &Imports) {
    let entry = builder.create_block();
    let row_head = builder.create_block();
    let row_start = builder.create_block();
    let col_head = builder.create_block();
    let col_body = builder.create_block();
    let col_step = builder.create_block();
    let row_end = builder.create_block();
    let row_step = builder.create_block();
    let exit = builder.create_block();

    let row = Variable::new(0);
    let col = Variable::new(1);
    let number = Variable::new(2);
    builder.declare_var(row, types::I64);
    builder.declare_var(col, types::I64);
    builder.declare_var(number, types::I64);

    // entry: row = 1, number = 1
    builder.append_block_params_for_function_params(entry);
    builder.switch_to_block(entry);
    let params = builder.block_params(entry).to_vec();
    let (rows, sink) = (params[0], params[1]);
    let one = builder.ins().iconst(types::I64, 1);
    let first = builder.ins().iconst(types::I64, FIRST_NUMBER);
    builder.def_var(row, one);
    builder.def_var(number, first);
    builder.ins().jump(row_head, &[]);

    // while row <= rows
    builder.switch_to_block(row_head);
    let i = builder.use_var(row);
    let more_rows = builder.ins().icmp(IntCC::SignedLessThanOrEqual, i, rows);
    builder.ins().brif(more_rows, row_start, &[], exit, &[]);

    builder.switch_to_block(row_start);
    let one = builder.ins().iconst(types::I64, 1);
    builder.def_var(col, one);
    builder.ins().jump(col_head, &[]);

    // while col <= row
    builder.switch_to_block(col_head);
    let j = builder.use_var(col);
    let i = builder.use_var(row);
    let more_cols = builder.ins().icmp(IntCC::SignedLessThanOrEqual, j, i);
    builder.ins().brif(more_cols, col_body, &[], row_end, &[]);

    // print number; stop once the sink has failed
    builder.switch_to_block(col_body);
    let n = builder.use_var(number);
    let emit = builder.ins().call(imports.emit_number, &[sink, n]);
    let status = builder.inst_results(emit)[0];
    builder.ins().brif(status, exit, &[], col_step, &[]);

    // number = env.increment(number); col += 1
    builder.switch_to_block(col_step);
    let n = builder.use_var(number);
    let call = builder.ins().call(imports.increment, &[n]);
    let next = builder.inst_results(call)[0];
    builder.def_var(number, next);
    let j = builder.use_var(col);
    let j_next = builder.ins().iadd_imm(j, 1);
    builder.def_var(col, j_next);
    builder.ins().jump(col_head, &[]);

    // print "."; stop once the sink has failed
    builder.switch_to_block(row_end);
    let end = builder.ins().call(imports.end_row, &[sink]);
    let status = builder.inst_results(end)[0];
    builder.ins().brif(status, exit, &[], row_step, &[]);

    // row += 1
    builder.switch_to_block(row_step);
    let i = builder.use_var(row);
    let i_next = builder.ins().iadd_imm(i, 1);
    builder.def_var(row, i_next);
    builder.ins().jump(row_head, &[]);

    builder.switch_to_block(exit);
    let n = builder.use_var(number);
    builder.ins().return_(&[n]);

    builder.seal_all_blocks();
}
