//! Query and mutation operations, grouped by table.

mod documents;
mod tags;
