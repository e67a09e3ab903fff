//! Opcode bodies for the unprefixed table.
//!
//! Every handler has the same shape so it can sit in the dispatch table:
//! it receives the opcode byte it was decoded from and returns the ticks to
//! add on top of the table's base cost (the branch-taken penalty, or zero).

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;
