use std::process::ExitCode;

use secret_prompt::{logging, EnvConfig, PasswordPrompt, PromptError};

fn main() -> ExitCode {
    if let Err(err) = logging::init(&EnvConfig::from_env()) {
        eprintln!("logging disabled: {err}");
    }

    let mut prompt = PasswordPrompt::new("Password (Ctrl-R shows/hides): ");
    prompt.enable_visibility_toggle = true;
    prompt.enable_arrows_navigation = true;
    prompt.min_length = Some(4);
    prompt.set_mask(Some('•'));

    match prompt.prompt() {
        Ok(Some(secret)) => {
            println!("got a {}-byte secret", secret.len());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("skipped");
            ExitCode::SUCCESS
        }
        Err(err @ (PromptError::Interrupted | PromptError::Canceled)) => {
            eprintln!("{err}");
            ExitCode::from(130)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
