//! The fetch-decode-execute engine.
//!
//! A [`Machine`] is driven one line at a time with [`Machine::step`].
//! `input` is the only suspension point: the step that decodes it returns
//! [`Step::AwaitingInput`] and the machine makes no further progress until
//! the host calls [`Machine::resume`]. [`run`] drives the loop to
//! completion for hosts that can block.

use serde::Serialize;
use tracing::{debug, info, warn};
use welang_decoder::{decode, Decoded, Instruction, Keyword, DEBUG_OFF_TOKEN};
use welang_types::{Program, Value};

use crate::config::InterpreterConfig;
use crate::error::{ExecError, ExecResult, InputError};
use crate::host::{Host, InputRequest, Output};
use crate::state::{InterpreterState, Phase};

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    /// The instruction pointer reached the end of the program.
    Completed,
    /// The host could not supply input for `variable`.
    InputUnavailable { variable: String, error: InputError },
}

impl HaltReason {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// What one call to [`Machine::step`] (or [`Machine::resume`]) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// No program has been started.
    Idle,
    /// An instruction was applied (possibly as a no-op with a diagnostic).
    Executed(Keyword),
    /// Blank line or comment.
    Ignored,
    /// Unrecognized line.
    Skipped,
    /// Waiting for [`Machine::resume`].
    AwaitingInput(InputRequest),
    Halted(HaltReason),
}

/// The result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Final state, owned by the caller.
    pub state: InterpreterState,
    pub halt: HaltReason,
    /// Lines fetched.
    pub steps: usize,
}

/// A WeLang interpreter instance.
pub struct Machine {
    config: InterpreterConfig,
    program: Program,
    state: InterpreterState,
    phase: Phase,
    pending: Option<InputRequest>,
    halt: Option<HaltReason>,
    steps: usize,
}

impl Machine {
    /// Create an idle machine.
    pub fn new(config: InterpreterConfig) -> Self {
        let program = Program::new(config.file_name.clone(), "");
        let state = InterpreterState::new(config.debug_default);
        Self {
            config,
            program,
            state,
            phase: Phase::Idle,
            pending: None,
            halt: None,
            steps: 0,
        }
    }

    /// Begin a new run with fresh state, discarding any previous one.
    pub fn start(&mut self, source: &str) {
        self.program = Program::new(self.config.file_name.clone(), source);
        self.state = InterpreterState::new(self.config.debug_default);
        self.phase = Phase::Running;
        self.pending = None;
        self.halt = None;
        self.steps = 0;
        info!(
            file = %self.program.name,
            lines = self.program.line_count(),
            "starting run"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn pending_input(&self) -> Option<&InputRequest> {
        self.pending.as_ref()
    }

    pub fn halt_reason(&self) -> Option<&HaltReason> {
        self.halt.as_ref()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Take the final state, leaving a fresh one behind.
    pub fn take_state(&mut self) -> InterpreterState {
        std::mem::replace(
            &mut self.state,
            InterpreterState::new(self.config.debug_default),
        )
    }

    // ══════════════════════════════════════════════════════════════════════
    // Stepping
    // ══════════════════════════════════════════════════════════════════════

    /// Execute the next line.
    pub fn step<O: Output + ?Sized>(&mut self, out: &mut O) -> Step {
        match self.phase {
            Phase::Idle => return Step::Idle,
            Phase::Halted => return self.halted_step(),
            Phase::Running => {}
        }
        if let Some(request) = &self.pending {
            return Step::AwaitingInput(request.clone());
        }

        let Some(raw) = self.program.fetch(self.state.ip) else {
            return self.halt(HaltReason::Completed);
        };
        let raw = raw.to_string();
        // Advance before executing: an instruction never re-reads its own line.
        self.state.ip += 1;
        self.steps += 1;
        let line_no = self.state.ip as u32;

        match decode(&raw) {
            Decoded::Ignore => Step::Ignored,
            Decoded::Unrecognized(u) => {
                debug!(line = line_no, reason = %u.reason, "skipping unrecognized line");
                if self.config.report_unrecognized {
                    self.report(out, &ExecError::Unrecognized(u), line_no);
                }
                Step::Skipped
            }
            Decoded::Instruction(inst) => {
                debug!(line = line_no, instruction = %inst, "execute");
                let keyword = inst.keyword();
                match self.execute(inst, line_no, out) {
                    Ok(Some(request)) => {
                        self.pending = Some(request.clone());
                        Step::AwaitingInput(request)
                    }
                    Ok(None) => Step::Executed(keyword),
                    Err(err) => {
                        self.report(out, &err, line_no);
                        Step::Executed(keyword)
                    }
                }
            }
        }
    }

    /// Complete a pending `input` with the host's answer.
    ///
    /// An `Err` is fatal: it is reported and the run halts.
    pub fn resume<O: Output + ?Sized>(
        &mut self,
        input: Result<String, InputError>,
        out: &mut O,
    ) -> Step {
        let Some(request) = self.pending.take() else {
            return match self.phase {
                Phase::Idle => Step::Idle,
                Phase::Halted => self.halted_step(),
                Phase::Running => self.step(out),
            };
        };

        match input {
            Ok(text) => {
                self.state
                    .variables
                    .set(&request.variable, Value::Text(text.clone()));
                self.trace(out, || {
                    format!("Variable {} set to '{}'", request.variable, text)
                });
                Step::Executed(Keyword::Input)
            }
            Err(error) => {
                let err = ExecError::InputUnavailable {
                    name: request.variable.clone(),
                    error: error.clone(),
                };
                self.report(out, &err, request.line);
                warn!(variable = %request.variable, %error, "input unavailable, halting");
                self.halt(HaltReason::InputUnavailable {
                    variable: request.variable,
                    error,
                })
            }
        }
    }

    /// Cancel a pending `input`. Cancellation is fatal to the run.
    pub fn cancel_input<O: Output + ?Sized>(&mut self, out: &mut O) -> Step {
        self.resume(Err(InputError::Cancelled), out)
    }

    fn halt(&mut self, reason: HaltReason) -> Step {
        info!(steps = self.steps, ?reason, "run halted");
        self.phase = Phase::Halted;
        self.halt = Some(reason.clone());
        Step::Halted(reason)
    }

    fn halted_step(&self) -> Step {
        Step::Halted(self.halt.clone().unwrap_or(HaltReason::Completed))
    }

    fn report<O: Output + ?Sized>(&self, out: &mut O, err: &ExecError, line_no: u32) {
        let source_line = self.program.line(line_no).unwrap_or("").trim();
        out.report(&err.to_diagnostic(&self.program.name, line_no, source_line));
    }

    /// Emit a debug trace; the message is only built when debug mode is on.
    fn trace<O: Output + ?Sized>(&self, out: &mut O, message: impl FnOnce() -> String) {
        if self.state.debug_mode {
            out.trace(&message());
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Instruction effects
    // ══════════════════════════════════════════════════════════════════════

    /// Apply one instruction. `Ok(Some(_))` means the machine suspends.
    fn execute<O: Output + ?Sized>(
        &mut self,
        inst: Instruction,
        line_no: u32,
        out: &mut O,
    ) -> ExecResult<Option<InputRequest>> {
        match inst {
            Instruction::DeclareVariable { name } => {
                self.state.variables.declare(&name);
                self.trace(out, || format!("Variable {name} declared."));
            }
            Instruction::AssignText { name, value } => {
                if !self.state.variables.assign(&name, Value::Text(value.clone())) {
                    return Err(ExecError::UndeclaredVariable { name });
                }
                self.trace(out, || format!("Variable {name} set to '{value}'"));
            }
            Instruction::SetInteger { name, value } => {
                self.state.variables.set(&name, Value::Integer(value));
                self.trace(out, || format!("Set: {name} = {value}"));
            }
            Instruction::AddInteger { name, value } => {
                self.exec_add(&name, value)?;
                self.trace(out, || format!("Added: {name} += {value}"));
            }
            Instruction::SetDebugMode { token } => {
                self.state.debug_mode = token != DEBUG_OFF_TOKEN;
                self.trace(out, || format!("Modifier set: {token}"));
            }
            Instruction::BindCommand { alias } => {
                let Some(last) = self.state.variables.last_inserted().map(str::to_string) else {
                    debug!(%alias, "no variables declared, binding skipped");
                    return Ok(None);
                };
                self.state.commands.bind(&alias, &last);
                self.trace(out, || {
                    format!("Command '{alias}' assigned to variable '{last}'")
                });
            }
            Instruction::InvokeCommand { name } => match self.state.variables.get(&name) {
                Some(value) => out.emit(value),
                None => return Err(ExecError::VariableNotFound { name }),
            },
            Instruction::ReadInput { name } => {
                if !self.state.variables.contains(&name) {
                    return Err(ExecError::UndeclaredVariable { name });
                }
                return Ok(Some(InputRequest {
                    variable: name,
                    line: line_no,
                }));
            }
        }
        Ok(None)
    }

    fn exec_add(&mut self, name: &str, value: i64) -> ExecResult<()> {
        let slot = self
            .state
            .variables
            .get_mut(name)
            .ok_or_else(|| ExecError::UndeclaredVariable {
                name: name.to_string(),
            })?;
        let current = match slot {
            Value::Integer(current) => current,
            other => {
                return Err(ExecError::TypeMismatch {
                    name: name.to_string(),
                    found: other.type_name(),
                })
            }
        };
        *current = current
            .checked_add(value)
            .ok_or_else(|| ExecError::IntegerOverflow {
                name: name.to_string(),
                value,
            })?;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Blocking runs
// ══════════════════════════════════════════════════════════════════════════════

/// Run a program to completion with the default configuration.
pub fn run<H: Host + ?Sized>(source: &str, host: &mut H) -> RunOutcome {
    run_with_config(source, &InterpreterConfig::default(), host)
}

/// Run a program to completion, blocking on the host for every `input`.
pub fn run_with_config<H: Host + ?Sized>(
    source: &str,
    config: &InterpreterConfig,
    host: &mut H,
) -> RunOutcome {
    let mut machine = Machine::new(config.clone());
    machine.start(source);

    let halt = loop {
        match machine.step(host) {
            Step::AwaitingInput(request) => {
                let input = host.read_input(&request);
                if let Step::Halted(reason) = machine.resume(input, host) {
                    break reason;
                }
            }
            Step::Halted(reason) => break reason,
            Step::Idle => break HaltReason::Completed,
            Step::Executed(_) | Step::Ignored | Step::Skipped => {}
        }
    };

    RunOutcome {
        steps: machine.steps(),
        state: machine.take_state(),
        halt,
    }
}
