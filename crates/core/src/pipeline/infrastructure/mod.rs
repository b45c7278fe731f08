pub mod default_synthesizer;
