// task-manager/src/utils/email.rs

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// メール送信エラー
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Missing email configuration: {0}")]
    MissingConfiguration(&'static str),
}

/// メール設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP サーバーホスト
    pub smtp_host: String,
    /// SMTP サーバーポート
    pub smtp_port: u16,
    /// SMTP ユーザー名
    pub smtp_username: String,
    /// SMTP パスワード
    pub smtp_password: String,
    /// 送信者メールアドレス
    pub from_email: String,
    /// 送信者名
    pub from_name: String,
    /// STARTTLS を使用するか
    pub use_tls: bool,
    /// 開発モードかどうか（ログ出力のみ）
    pub development_mode: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Task Manager".to_string(),
            use_tls: true,
            development_mode: true,
        }
    }
}

impl EmailConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, EmailError> {
        let development_mode = env::var("EMAIL_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let from_name = env::var("FROM_NAME").unwrap_or_else(|_| "Task Manager".to_string());

        if development_mode {
            return Ok(Self {
                from_email: env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@example.com".to_string()),
                from_name,
                development_mode: true,
                ..Default::default()
            });
        }

        let smtp_host =
            env::var("SMTP_HOST").map_err(|_| EmailError::MissingConfiguration("SMTP_HOST"))?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| EmailError::ConfigurationError("Invalid SMTP port".to_string()))?;

        let smtp_username = env::var("SMTP_USERNAME")
            .map_err(|_| EmailError::MissingConfiguration("SMTP_USERNAME"))?;

        let smtp_password = env::var("SMTP_PASSWORD")
            .map_err(|_| EmailError::MissingConfiguration("SMTP_PASSWORD"))?;

        let from_email =
            env::var("FROM_EMAIL").map_err(|_| EmailError::MissingConfiguration("FROM_EMAIL"))?;

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_email,
            from_name,
            use_tls,
            development_mode: false,
        })
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<(), EmailError> {
        if !is_valid_email(&self.from_email) {
            return Err(EmailError::InvalidAddress(self.from_email.clone()));
        }

        if self.development_mode {
            return Ok(());
        }

        if self.smtp_host.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP host is required".to_string(),
            ));
        }

        if self.smtp_username.is_empty() || self.smtp_password.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP credentials are required".to_string(),
            ));
        }

        Ok(())
    }

    fn sender(&self) -> Result<Mailbox, EmailError> {
        let address = self
            .from_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.from_email.clone()))?;
        Ok(Mailbox::new(Some(self.from_name.clone()), address))
    }
}

/// メール送信内容（プレーンテキストのみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 宛先メールアドレス
    pub to_email: String,
    /// 件名
    pub subject: String,
    /// 本文
    pub body: String,
}

/// メール送信の抽象化
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// SMTP 経由で送信する Mailer
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| EmailError::ConfigurationError(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: config.sender()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let recipient: Mailbox = message
            .to_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(message.to_email.clone()))?;

        let email = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        info!(
            to_email = %mask_email(&message.to_email),
            subject = %message.subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

/// 開発モード用。送信せずにログ出力のみ行う
pub struct DevelopmentMailer {
    from_email: String,
}

impl DevelopmentMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            from_email: config.from_email.clone(),
        }
    }
}

#[async_trait]
impl Mailer for DevelopmentMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if !is_valid_email(&message.to_email) {
            return Err(EmailError::InvalidAddress(message.to_email.clone()));
        }

        info!(
            from = %self.from_email,
            to_email = %mask_email(&message.to_email),
            subject = %message.subject,
            "📧 Email (development mode, not sent)"
        );
        debug!(body = %message.body, "Email body");
        Ok(())
    }
}

/// 設定に応じた Mailer を生成する
pub fn build_mailer(config: &EmailConfig) -> Result<Arc<dyn Mailer>, EmailError> {
    if config.development_mode {
        config.validate()?;
        Ok(Arc::new(DevelopmentMailer::new(config)))
    } else {
        Ok(Arc::new(SmtpMailer::new(config)?))
    }
}

/// 簡易的なメールアドレス形式チェック
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    !email.chars().any(char::is_whitespace)
}

/// ログ出力用にメールアドレスをマスクする
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.chars().count() <= 2 {
            "*".repeat(local.chars().count())
        } else {
            let first: String = local.chars().take(1).collect();
            format!("{}****", first)
        };
        format!("{}{}", masked_local, domain)
    } else {
        "****@****".to_string()
    }
}
