use crate::domain::ports::Operator;
use crate::utils::error::Result;

pub const CONFIRMATION_TOKEN: &str = "done";

/// 阻塞直到操作者輸入 `done`（不分大小寫），其他輸入一律重新提示
pub fn checkpoint<O: Operator + ?Sized>(operator: &mut O, message: &str) -> Result<()> {
    let prompt = format!(
        "{} (type '{}' to continue, CTRL+C to quit)",
        message, CONFIRMATION_TOKEN
    );
    tracing::debug!("Waiting at checkpoint: {}", message);

    loop {
        let answer = operator.ask(&prompt)?;
        if answer.trim().eq_ignore_ascii_case(CONFIRMATION_TOKEN) {
            return Ok(());
        }
    }
}

/// 只接受 `y` / `n`
pub fn ask_yes_no<O: Operator + ?Sized>(operator: &mut O, message: &str) -> Result<bool> {
    loop {
        let answer = operator.ask(message)?.trim().to_lowercase();
        match answer.as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}
