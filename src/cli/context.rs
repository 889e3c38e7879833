//! Per-process state shared by every command

use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    AccessPolicy, Action, Config, Dashboard, FileStorage, Identity, Paths, Section, Session,
    StaticCredentials, StaticPolicy,
};

/// Everything a command needs: configuration, login, records and rules
///
/// A one-shot command builds a fresh context; the shell keeps one alive so
/// record changes carry over between lines.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub session: Session<FileStorage>,
    pub credentials: StaticCredentials,
    pub policy: StaticPolicy,
    pub dashboard: Dashboard,
}

impl Context {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let paths = Paths::resolve(global.home.as_deref())?;
        let config = Config::load(&paths)?;
        let session = Session::open(FileStorage::new(&paths.data_dir))?
            .with_login_delay(config.login_delay());
        let dashboard = Dashboard::seeded().with_delete_policy(config.delete_policy());

        Ok(Self {
            paths,
            config,
            session,
            credentials: StaticCredentials::default(),
            policy: StaticPolicy,
            dashboard,
        })
    }

    /// Output format after applying the configured default
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        global.resolved_format(self.config.default_format.as_deref())
    }

    /// The logged-in identity, checked against the access policy
    pub fn authorize(&self, section: Section, action: Action) -> Result<&Identity> {
        let identity = self.session.require()?;
        self.policy.authorize(identity.role, section, action)?;
        Ok(identity)
    }
}
