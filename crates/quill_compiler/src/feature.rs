//! Names of private function families and compiler-owned score holders.

/// Arms of an if/else chain.
pub const IF_ELSE: &str = "if_else";
/// `while` loop bodies.
pub const WHILE_LOOP: &str = "while_loop";
/// `do`/`while` loop bodies.
pub const DO_WHILE_LOOP: &str = "do_while_loop";
/// `for` loop bodies.
pub const FOR_LOOP: &str = "for_loop";
/// Switch dispatch nodes and case bodies.
pub const SWITCH_CASE: &str = "switch_case";
/// `Player.onEvent` handlers.
pub const ON_EVENT: &str = "on_event";
/// Integer square root.
pub const MATH_SQRT: &str = "math_sqrt";
/// Counter for `__logic__<n>` flags; allocates no functions.
pub const LOGIC: &str = "logic";

/// Holder recording whether an earlier arm of an if/else chain ran.
pub const IF_ELSE_FLAG: &str = "__if_else__";
