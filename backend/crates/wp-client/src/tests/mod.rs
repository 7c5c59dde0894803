mod query_cache;
mod sse_parser;
