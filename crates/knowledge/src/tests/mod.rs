//! Cross-module scenarios for the RAG workflow and index lifecycle.

mod support;
