//! Telegram 接入最小配置：仅 token 与可选 API URL。

use anyhow::Result;

/// Telegram Bot 接入配置。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// 可选：Bot API 基础 URL（测试时可指向 mock 服务器）。
    pub api_url: Option<String>,
}

impl TelegramConfig {
    /// 构造 teloxide::Bot；设置了 api_url 时请求发往该地址，URL 非法则返回错误。
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match &self.api_url {
            Some(url_str) => {
                let url = reqwest::Url::parse(url_str)
                    .map_err(|e| anyhow::anyhow!("Invalid Telegram API url {}: {}", url_str, e))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
