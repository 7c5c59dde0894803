mod change_kind;
mod cursor;
mod envelope;
mod envelope_draft;
mod sync_module;
