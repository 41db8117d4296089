//! Recursive Kconfig loader.
//!
//! [`KconfigParser`] reads a root Kconfig file, follows `source` directives
//! depth-first and feeds every logical line through the directive
//! recognizer. Scope stacks and the symbol table live on the parser and are
//! shared by all files; the open block and help state are per file, so a
//! file boundary always ends the current symbol.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::context::ContextStack;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::directive::{Directive, SourceKind, recognize, unquote};
use crate::error::{KconfigError, Result};
use crate::help::{HelpBlock, HelpLine, HelpOwner};
use crate::lines::{LogicalLine, logical_lines};
use crate::options::ParseOptions;
use crate::symbol::{ChoiceScope, MenuScope, TypeEntry};
use crate::table::{SymbolTable, TableBuilder};

/// The declaration whose property lines are currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Config,
    Menu,
    Choice,
    /// `comment "..."`: its `depends on` is accepted and dropped.
    Comment,
}

#[derive(Debug)]
enum Mode {
    Directives,
    Help(HelpBlock),
}

/// Per-file parse state.
#[derive(Debug)]
struct FileState {
    block: Block,
    mode: Mode,
}

impl FileState {
    fn new() -> Self {
        Self {
            block: Block::None,
            mode: Mode::Directives,
        }
    }
}

/// Builds a [`SymbolTable`] from a tree of Kconfig files.
///
/// One parser instance handles one tree; it is consumed by
/// [`finish`](Self::finish) or [`parse`](Self::parse).
#[derive(Debug)]
pub struct KconfigParser {
    options: ParseOptions,
    builder: TableBuilder,
    scopes: ContextStack,
    visited: HashSet<PathBuf>,
    files: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    root: Option<String>,
}

impl KconfigParser {
    /// A parser with empty scopes and no files visited.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            builder: TableBuilder::new(),
            scopes: ContextStack::new(),
            visited: HashSet::new(),
            files: Vec::new(),
            diagnostics: Vec::new(),
            root: None,
        }
    }

    /// Parses `root` (relative to the source root) and everything it
    /// sources, then returns the finished table.
    ///
    /// # Errors
    ///
    /// Fails if any non-optional file cannot be read, or on an unbalanced
    /// scope closer in strict mode. No partial table is returned.
    pub fn parse(mut self, root: &str) -> Result<SymbolTable> {
        self.load(root)?;
        Ok(self.finish())
    }

    /// Parses one more file into this parser's table.
    ///
    /// Files already visited, through this call or any `source`, are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Same conditions as [`parse`](Self::parse).
    pub fn load(&mut self, path: &str) -> Result<()> {
        let rel = {
            let substituted = self.options.arch_table.substitute(path, &self.options.arch);
            normalize(Path::new(substituted.as_ref()))
        };
        if self.root.is_none() {
            self.root = Some(rel.to_string_lossy().into_owned());
        }
        self.load_file(&rel)
    }

    /// Freezes the parser into its [`SymbolTable`].
    #[must_use]
    pub fn finish(mut self) -> SymbolTable {
        let (ifs, menus, choices) = self.scopes.unclosed();
        if ifs + menus + choices > 0 {
            let root = self.root.clone().unwrap_or_default();
            self.record(
                Severity::Warning,
                DiagnosticKind::Unclosed,
                &root,
                None,
                format!("unclosed scopes at end of input: {ifs} if, {menus} menu, {choices} choice"),
            );
        }
        debug!(
            symbols = self.builder.len(),
            files = self.files.len(),
            "kconfig parse finished"
        );
        self.builder.finish(self.files, self.diagnostics)
    }

    fn load_file(&mut self, rel: &Path) -> Result<()> {
        let abs = self.options.source_root.join(rel);
        if !self.visited.insert(normalize(&abs)) {
            debug!(file = %rel.display(), "already loaded, skipping");
            return Ok(());
        }

        let ident = rel.to_string_lossy().into_owned();
        debug!(file = %ident, "loading kconfig");
        let file = File::open(&abs).map_err(|e| KconfigError::io(&abs, e))?;
        self.files.push(ident.clone());

        let mut state = FileState::new();
        for line in logical_lines(BufReader::new(file)) {
            let line = line.map_err(|e| KconfigError::io(&abs, e))?;
            self.feed(&ident, rel, &mut state, &line)?;
        }
        self.end_help(&mut state);
        self.builder.close();
        Ok(())
    }

    fn feed(&mut self, file: &str, rel: &Path, state: &mut FileState, line: &LogicalLine) -> Result<()> {
        if let Mode::Help(block) = &mut state.mode {
            let owner = block.owner();
            match block.feed(&line.text) {
                HelpLine::Skip => return Ok(()),
                HelpLine::Text(text) => {
                    if owner == HelpOwner::Symbol {
                        self.builder.append_help(text);
                    }
                    return Ok(());
                }
                HelpLine::End => self.end_help(state),
            }
        }
        self.dispatch(file, rel, state, line)
    }

    fn end_help(&mut self, state: &mut FileState) {
        if let Mode::Help(block) = std::mem::replace(&mut state.mode, Mode::Directives) {
            if block.owner() == HelpOwner::Symbol {
                self.builder.trim_help();
            }
        }
    }

    fn close_block(&mut self, state: &mut FileState) {
        state.block = Block::None;
        self.builder.close();
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch(&mut self, file: &str, rel: &Path, state: &mut FileState, line: &LogicalLine) -> Result<()> {
        let number = line.number;
        let directive = recognize(&line.text);
        trace!(file, line = number, ?directive, "dispatch");

        match directive {
            Directive::Blank | Directive::Comment | Directive::Assignment | Directive::MacroCall => {}

            Directive::Source { kind, path, indented } => {
                if indented {
                    self.record(
                        Severity::Warning,
                        DiagnosticKind::IndentedSource,
                        file,
                        Some(number),
                        format!("indented source directive for \"{path}\""),
                    );
                }
                self.close_block(state);
                self.source(kind, path, rel, file, number)?;
            }

            Directive::If(cond) => {
                self.close_block(state);
                self.scopes.push_if(cond);
            }
            Directive::EndIf => {
                self.close_block(state);
                if self.scopes.pop_if().is_none() {
                    self.unbalanced(file, number, "endif")?;
                }
            }

            Directive::CommentBlock(_) => {
                self.close_block(state);
                state.block = Block::Comment;
            }

            Directive::Menu(title) => {
                self.close_block(state);
                self.scopes.push_menu(MenuScope::new(title));
                state.block = Block::Menu;
            }
            Directive::MainMenu(title) => {
                self.close_block(state);
                self.scopes.push_main_menu(MenuScope::new(title));
                state.block = Block::Menu;
            }
            Directive::EndMenu => {
                self.close_block(state);
                if self.scopes.pop_menu().is_none() {
                    self.unbalanced(file, number, "endmenu")?;
                }
            }

            Directive::Choice(name) => {
                self.close_block(state);
                self.scopes.push_choice(ChoiceScope {
                    name: name.map(str::to_string),
                    ..ChoiceScope::default()
                });
                state.block = Block::Choice;
            }
            Directive::EndChoice => {
                self.close_block(state);
                if self.scopes.pop_choice().is_none() {
                    self.unbalanced(file, number, "endchoice")?;
                }
            }

            Directive::Config { name, menuconfig } => {
                self.close_block(state);
                self.builder.declare(name, file, &self.scopes);
                if menuconfig {
                    self.builder.mark_menuconfig();
                }
                state.block = Block::Config;
            }

            Directive::DependsOn(expr) => match state.block {
                Block::Config => {
                    self.builder.append_depends_on(expr);
                }
                Block::Menu => {
                    if let Some(menu) = self.scopes.menu_mut() {
                        menu.depends_on.push(expr.to_string());
                    }
                }
                Block::Choice => {
                    if let Some(choice) = self.scopes.choice_mut() {
                        choice.depends_on.push(expr.to_string());
                    }
                }
                Block::Comment => {}
                Block::None => self.orphan(file, number, "depends on"),
            },

            Directive::VisibleIf(expr) => match state.block {
                Block::Menu => {
                    if let Some(menu) = self.scopes.menu_mut() {
                        menu.visible_if.push(expr.to_string());
                    }
                }
                _ => self.orphan(file, number, "visible if"),
            },

            Directive::Type { kind, rest } => match state.block {
                Block::Config => {
                    self.builder.append_type(kind, rest);
                }
                Block::Choice => {
                    if let Some(choice) = self.scopes.choice_mut() {
                        choice.type_entries.push(TypeEntry {
                            kind,
                            rest: rest.map(str::to_string),
                        });
                    }
                }
                _ => self.orphan(file, number, kind.keyword()),
            },

            Directive::Default { kind, expr } => match state.block {
                Block::Config => {
                    self.builder.append_default(kind, expr);
                }
                Block::Choice => {
                    if let Some(choice) = self.scopes.choice_mut() {
                        choice.default.push(expr.to_string());
                    }
                }
                _ => self.orphan(file, number, kind.keyword()),
            },

            Directive::Prompt(text) => match state.block {
                Block::Config => {
                    self.builder.append_prompt(text);
                }
                Block::Choice => {
                    if let Some(choice) = self.scopes.choice_mut() {
                        choice.prompt = unquote(text).to_string();
                    }
                }
                _ => self.orphan(file, number, "prompt"),
            },

            Directive::Select(expr) => self.symbol_property(state, file, number, "select", |b| b.append_select(expr)),
            Directive::Imply(expr) => self.symbol_property(state, file, number, "imply", |b| b.append_imply(expr)),
            Directive::Range(expr) => self.symbol_property(state, file, number, "range", |b| b.append_range(expr)),
            Directive::Option(expr) => self.symbol_property(state, file, number, "option", |b| b.append_option(expr)),

            Directive::Help => match state.block {
                Block::Config => state.mode = Mode::Help(HelpBlock::new(HelpOwner::Symbol)),
                Block::Choice => state.mode = Mode::Help(HelpBlock::new(HelpOwner::Choice)),
                _ => self.orphan(file, number, "help"),
            },

            Directive::Optional => {
                if state.block != Block::Choice {
                    self.orphan(file, number, "optional");
                }
            }

            Directive::Unknown => self.record(
                Severity::Debug,
                DiagnosticKind::Ignored,
                file,
                Some(number),
                format!("ignored line: {}", line.text.trim()),
            ),
        }
        Ok(())
    }

    /// Applies a property that only symbols carry.
    fn symbol_property(
        &mut self,
        state: &FileState,
        file: &str,
        line: usize,
        keyword: &str,
        apply: impl FnOnce(&mut TableBuilder) -> bool,
    ) {
        if state.block != Block::Config || !apply(&mut self.builder) {
            self.orphan(file, line, keyword);
        }
    }

    fn source(&mut self, kind: SourceKind, raw: &str, including: &Path, file: &str, line: usize) -> Result<()> {
        let substituted = self.options.arch_table.substitute(raw, &self.options.arch);
        let target = if kind.relative {
            including
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(substituted.as_ref())
        } else {
            PathBuf::from(substituted.as_ref())
        };
        let target = normalize(&target);

        if kind.optional && !self.options.source_root.join(&target).is_file() {
            self.record(
                Severity::Debug,
                DiagnosticKind::MissingOptionalSource,
                file,
                Some(line),
                format!("optional source {} not found", target.display()),
            );
            return Ok(());
        }
        self.load_file(&target)
    }

    fn unbalanced(&mut self, file: &str, line: usize, directive: &'static str) -> Result<()> {
        if self.options.strict_balance {
            return Err(KconfigError::Unbalanced {
                file: file.to_string(),
                line,
                directive,
            });
        }
        self.record(
            Severity::Warning,
            DiagnosticKind::Unbalanced,
            file,
            Some(line),
            format!("`{directive}` without a matching opener"),
        );
        Ok(())
    }

    fn orphan(&mut self, file: &str, line: usize, keyword: &str) {
        self.record(
            Severity::Debug,
            DiagnosticKind::NoOpenDeclaration,
            file,
            Some(line),
            format!("`{keyword}` outside of any declaration"),
        );
    }

    fn record(&mut self, severity: Severity, kind: DiagnosticKind, file: &str, line: Option<usize>, message: String) {
        match severity {
            Severity::Debug => debug!(file, line = ?line, "{message}"),
            Severity::Warning => warn!(file, line = ?line, "{message}"),
        }
        self.diagnostics.push(Diagnostic {
            severity,
            kind,
            file: file.to_string(),
            line,
            message,
        });
    }
}

/// Lexically removes `.` and resolves `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
