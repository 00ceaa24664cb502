pub mod doc_fixture_builder;
