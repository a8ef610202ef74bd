use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chat screen (default)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question, sent exactly as given
        question: String,
    },

    /// List the built-in questions matching the given text
    Suggest {
        input: String,
    },
}
