// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case. Printing results happens here and nowhere else.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildVocabArgs, ChatArgs, Commands, DecodeArgs, EncodeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "socrates",
    version,
    about = "Encode conversations into word-vector tensors and decode model output back into text."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildVocab(args) => run_build_vocab(args),
            Commands::Encode(args)     => run_encode(args),
            Commands::Decode(args)     => run_decode(args),
            Commands::Chat(args)       => run_chat(args),
        }
    }
}

fn run_build_vocab(args: BuildVocabArgs) -> Result<()> {
    use socrates::application::vocab_use_case::VocabUseCase;

    let config_path = VocabUseCase::new((&args).into(), &args.corpus).execute()?;
    println!("Vocabulary saved to {} (config: {})", args.output, config_path.display());
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    use socrates::application::encode_use_case::EncodeUseCase;

    tracing::info!("Encoding conversation file: {}", args.input);
    let shape = EncodeUseCase::new(args.codec.resolve()?, &args.input, &args.output).execute()?;
    println!("Wrote tensor of shape {} to {}", shape, args.output);
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    use socrates::application::encode_use_case::DecodeUseCase;

    for line in DecodeUseCase::new(args.codec.resolve()?, &args.input).execute()? {
        println!("{}", line.text);
    }
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    use socrates::application::chat_use_case::ChatUseCase;

    let chat  = ChatUseCase::new(&args.codec.resolve()?, args.history)?;
    let stdin = std::io::stdin();
    chat.run(stdin.lock(), std::io::stdout(), args.turns)?;
    Ok(())
}
