//! `MethodBuilder`: the per-method instruction emitter.
//!
//! Owns the bytes of one method's `Code` attribute before serialization: the instruction stream,
//! the operand-stack depth (so an emission that would underflow the stack is caught immediately,
//! rather than surfacing later as a broken class file), the maximum stack/local counts, the
//! exception table, and a label/patch list for forward branches. This is the "Method-context"
//! of the governing specification's data model.

use crate::error::{Error, Result};
use crate::label::{Label, LabelTable};
use crate::locals::LocalScope;
use javac_ast::Type;
use javac_classfile::attributes::{Attribute, ExceptionTableEntry, Instruction, MaxStack};
use javac_classfile::ConstantPool;

/// A loop or labeled-block context, pushed while compiling its body so that `break`/`continue`
/// statements can find their target label without threading it through every recursive call.
#[derive(Debug)]
struct LoopContext {
    label: Option<String>,
    break_label: Label,
    continue_label: Label,
}

#[derive(Debug)]
struct PendingBranch {
    instruction_index: usize,
    target: Label,
}

#[derive(Debug)]
pub struct MethodBuilder<'pool> {
    constant_pool: &'pool mut ConstantPool,
    instructions: Vec<Instruction>,
    labels: LabelTable,
    pending: Vec<PendingBranch>,
    exception_table: Vec<ExceptionTableEntry>,
    locals: LocalScope,
    stack_depth: i32,
    loop_stack: Vec<LoopContext>,
    /// Set once a `return`/`throw` has been emitted on the current straight-line path, so the
    /// code generator can skip dead code after it (e.g. an unreachable fall-through `return`).
    pub terminated: bool,
}

impl<'pool> MethodBuilder<'pool> {
    #[must_use]
    pub fn new(constant_pool: &'pool mut ConstantPool, is_static: bool, params: &[Type]) -> Self {
        MethodBuilder {
            constant_pool,
            instructions: Vec::new(),
            labels: LabelTable::default(),
            pending: Vec::new(),
            exception_table: Vec::new(),
            locals: LocalScope::new(is_static, params),
            stack_depth: 0,
            loop_stack: Vec::new(),
            terminated: false,
        }
    }

    #[must_use]
    pub fn constant_pool(&mut self) -> &mut ConstantPool {
        self.constant_pool
    }

    #[must_use]
    pub fn locals(&mut self) -> &mut LocalScope {
        &mut self.locals
    }

    #[must_use]
    pub fn current_instruction_index(&self) -> u16 {
        u16::try_from(self.instructions.len()).unwrap_or(u16::MAX)
    }

    pub fn new_label(&mut self) -> Label {
        self.labels.new_label()
    }

    /// Binds `label` to the instruction about to be emitted next.
    pub fn bind_label(&mut self, label: Label) -> Result<()> {
        self.labels.bind(label, self.current_instruction_index())
    }

    pub fn push_loop(&mut self, label: Option<String>, break_label: Label, continue_label: Label) {
        self.loop_stack.push(LoopContext {
            label,
            break_label,
            continue_label,
        });
    }

    pub fn pop_loop(&mut self) {
        self.loop_stack.pop();
    }

    /// Resolves a (possibly unlabeled) `break`/`continue` target, innermost loop first.
    #[must_use]
    pub fn break_target(&self, label: Option<&str>) -> Option<Label> {
        self.resolve_loop(label).map(|ctx| ctx.break_label)
    }

    #[must_use]
    pub fn continue_target(&self, label: Option<&str>) -> Option<Label> {
        self.resolve_loop(label).map(|ctx| ctx.continue_label)
    }

    fn resolve_loop(&self, label: Option<&str>) -> Option<&LoopContext> {
        match label {
            Some(name) => self.loop_stack.iter().rev().find(|ctx| ctx.label.as_deref() == Some(name)),
            None => self.loop_stack.last(),
        }
    }

    /// Emits a plain (non-branching) instruction and updates the tracked stack depth.
    pub fn emit(&mut self, instruction: Instruction) -> Result<()> {
        self.track_stack(&instruction)?;
        self.instructions.push(instruction);
        self.terminated = false;
        Ok(())
    }

    /// Emits a `return`/`athrow`/unconditional `goto` that ends the current straight-line path.
    pub fn emit_terminal(&mut self, instruction: Instruction) -> Result<()> {
        self.emit(instruction)?;
        self.terminated = true;
        Ok(())
    }

    /// Emits a forward- or backward-branching instruction. `make` builds the instruction from a
    /// placeholder target instruction index; the real index is filled in once `label` is bound.
    pub fn emit_branch(&mut self, label: Label, make: impl FnOnce(u16) -> Instruction) -> Result<()> {
        let instruction = make(0);
        self.track_stack(&instruction)?;
        let index = self.instructions.len();
        self.instructions.push(instruction);
        self.pending.push(PendingBranch {
            instruction_index: index,
            target: label,
        });
        Ok(())
    }

    /// Marks the start of a `try` region; returns the instruction index the eventual
    /// `ExceptionTableEntry::range_pc.start` should use.
    #[must_use]
    pub fn mark(&self) -> u16 {
        self.current_instruction_index()
    }

    /// Records an exception handler covering `[start, end)`, dispatching to `handler` when
    /// `catch_type` (or any throwable, if `catch_type == 0`) propagates out of that range.
    pub fn add_exception_handler(&mut self, start: u16, end: u16, handler: Label, catch_type: u16) -> Result<()> {
        let handler_pc = self.labels.resolve(handler)?;
        self.exception_table.push(ExceptionTableEntry {
            range_pc: start..end,
            handler_pc,
            catch_type,
        });
        Ok(())
    }

    fn track_stack(&mut self, instruction: &Instruction) -> Result<()> {
        let delta = i32::from(instruction.stack_delta(self.constant_pool)?);
        let depth = self.stack_depth + delta;
        if depth < 0 {
            return Err(Error::StackUnderflow {
                depth: self.stack_depth,
                popped: -delta,
            });
        }
        self.stack_depth = depth;
        Ok(())
    }

    /// Resolves every pending forward/backward branch target and returns the finished `Code`
    /// attribute. `name_index` is the `"Code"` UTF-8 constant-pool entry the caller already
    /// interned (typically once per class, shared across methods).
    pub fn finish(mut self, name_index: u16) -> Result<Attribute> {
        for pending in &self.pending {
            let target = self.labels.resolve(pending.target)?;
            patch_target(&mut self.instructions[pending.instruction_index], target);
        }

        let max_stack = self.instructions.max_stack(self.constant_pool)?;
        let max_locals = self.locals.slot_count();

        Ok(Attribute::Code {
            name_index,
            max_stack,
            max_locals,
            code: self.instructions,
            exception_table: self.exception_table,
            attributes: Vec::new(),
        })
    }
}

fn patch_target(instruction: &mut Instruction, target: u16) {
    match instruction {
        Instruction::Ifeq(offset)
        | Instruction::Ifne(offset)
        | Instruction::Iflt(offset)
        | Instruction::Ifge(offset)
        | Instruction::Ifgt(offset)
        | Instruction::Ifle(offset)
        | Instruction::If_icmpeq(offset)
        | Instruction::If_icmpne(offset)
        | Instruction::If_icmplt(offset)
        | Instruction::If_icmpge(offset)
        | Instruction::If_icmpgt(offset)
        | Instruction::If_icmple(offset)
        | Instruction::If_acmpeq(offset)
        | Instruction::If_acmpne(offset)
        | Instruction::Goto(offset)
        | Instruction::Ifnull(offset)
        | Instruction::Ifnonnull(offset) => *offset = target,
        other => unreachable!("{other:?} is not a patchable branch instruction"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javac_ast::Primitive;

    #[test]
    fn emits_a_simple_add_and_return() -> Result<()> {
        let mut pool = ConstantPool::new();
        let mut builder = MethodBuilder::new(&mut pool, true, &[]);
        builder.emit(Instruction::Iconst_1)?;
        builder.emit(Instruction::Iconst_2)?;
        builder.emit(Instruction::Iadd)?;
        builder.emit_terminal(Instruction::Ireturn)?;
        let name_index = builder.constant_pool().add_utf8("Code")?;
        let attribute = builder.finish(name_index)?;
        let Attribute::Code { max_stack, code, .. } = attribute else {
            panic!("expected Code attribute");
        };
        assert_eq!(max_stack, 2);
        assert_eq!(code.len(), 4);
        Ok(())
    }

    #[test]
    fn forward_branch_resolves_to_bound_label() -> Result<()> {
        let mut pool = ConstantPool::new();
        let mut builder = MethodBuilder::new(&mut pool, true, &[]);
        let end = builder.new_label();
        builder.emit(Instruction::Iconst_0)?;
        builder.emit_branch(end, Instruction::Ifeq)?;
        builder.emit(Instruction::Iconst_1)?;
        builder.emit(Instruction::Pop)?;
        builder.bind_label(end)?;
        builder.emit_terminal(Instruction::Return)?;
        let name_index = builder.constant_pool().add_utf8("Code")?;
        let attribute = builder.finish(name_index)?;
        let Attribute::Code { code, .. } = attribute else {
            panic!("expected Code attribute");
        };
        let Instruction::Ifeq(target) = code[1] else {
            panic!("expected Ifeq");
        };
        assert_eq!(target, 4);
        Ok(())
    }

    #[test]
    fn underflow_is_rejected() {
        let mut pool = ConstantPool::new();
        let mut builder = MethodBuilder::new(&mut pool, true, &[]);
        let result = builder.emit(Instruction::Pop);
        assert!(matches!(result, Err(Error::StackUnderflow { .. })));
    }

    #[test]
    fn locals_reserve_this_and_params() {
        let mut pool = ConstantPool::new();
        let builder = MethodBuilder::new(&mut pool, false, &[Type::Primitive(Primitive::Long)]);
        // this(1) + long param(2) = 3
        assert_eq!(builder.locals.slot_count(), 3);
    }
}
