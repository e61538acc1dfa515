use crate::auth_state::AuthState;
use crate::callback::{CallbackHandler, CallbackParams};
use crate::config::Config;
use crate::navigator::TerminalNavigator;
use crate::ports::{AuthApi, HistoryApi, MusicApi};
use anima_client::{
    AnalysisFilters, AuthClient, CreatePlaylistRequest, FileStorage, HistoryClient, LoginRequest,
    MemoryStorage, MusicClient, Outcome, PlaylistFilters, RegisterRequest, ResetPasswordRequest,
    SessionStore,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "anima",
    version,
    about = "Terminal client for the Anima emotion-to-music service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with a username or email (password is prompted)
    Login { username_or_email: String },
    /// Create an account (password is prompted; does not sign you in)
    Register {
        username: String,
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Clear the local session
    Logout,
    /// Show the current user as the backend sees it
    Whoami,
    /// Update profile fields
    UpdateProfile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        profile_picture: Option<String>,
    },
    /// Spotify account flows
    Spotify {
        #[command(subcommand)]
        command: SpotifyCommand,
    },
    /// Process an OAuth redirect URL directly
    Callback { url: String },
    /// Password recovery flows
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
    /// Saved playlists and analysis history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Playlists on the linked Spotify account
    Playlists {
        #[command(subcommand)]
        command: PlaylistCommand,
    },
}

#[derive(Subcommand)]
pub enum SpotifyCommand {
    /// Sign in or register through Spotify
    Login,
    /// Link Spotify to the signed-in account
    Link,
    /// Remove the Spotify link
    Disconnect,
}

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Send a reset code to an email
    Forgot { email: String },
    /// Change the password with a reset code (new password is prompted)
    Reset { email: String, code: String },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    Playlists {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        emotion: Option<String>,
        #[arg(long)]
        favorites: bool,
    },
    Analyses {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        emotion: Option<String>,
    },
    Stats,
}

#[derive(Subcommand)]
pub enum PlaylistCommand {
    List {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Spotify track ids
        #[arg(long = "track")]
        tracks: Vec<String>,
        #[arg(long)]
        public: bool,
    },
}

/// Wires storage, clients and the callback handler together for one
/// invocation of the binary.
pub struct Shell {
    session: SessionStore,
    auth: Arc<AuthClient>,
    history: Arc<HistoryClient>,
    music: Arc<MusicClient>,
    state: AuthState,
    handler: CallbackHandler,
}

impl Shell {
    pub fn new(config: &Config) -> Result<Self> {
        let storage = FileStorage::new().context("could not open the local data store")?;
        let session = SessionStore::new(Arc::new(storage));
        let base_url = config.api_base_url();

        let auth = Arc::new(AuthClient::new(&base_url, session.clone()));
        let history = Arc::new(HistoryClient::new(&base_url, session.clone()));
        let music = Arc::new(MusicClient::new(&base_url, session.clone()));

        let mut state = AuthState::new(
            Arc::clone(&auth) as Arc<dyn AuthApi>,
            session.clone(),
        );
        state.hydrate();

        let handler = CallbackHandler::new(
            Arc::clone(&auth) as Arc<dyn AuthApi>,
            Arc::clone(&history) as Arc<dyn HistoryApi>,
            Arc::clone(&music) as Arc<dyn MusicApi>,
            session.clone(),
            Arc::new(MemoryStorage::new()),
            Arc::new(TerminalNavigator),
        );

        Ok(Self {
            session,
            auth,
            history,
            music,
            state,
            handler,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username_or_email } => self.login(username_or_email).await,
            Command::Register {
                username,
                email,
                first_name,
                last_name,
            } => self.register(username, email, first_name, last_name).await,
            Command::Logout => {
                self.state.logout();
                println!("Signed out.");
                Ok(())
            }
            Command::Whoami => self.whoami().await,
            Command::UpdateProfile {
                first_name,
                last_name,
                profile_picture,
            } => self.update_profile(first_name, last_name, profile_picture).await,
            Command::Spotify { command } => match command {
                SpotifyCommand::Login => self.spotify_login().await,
                SpotifyCommand::Link => self.spotify_link().await,
                SpotifyCommand::Disconnect => self.spotify_disconnect().await,
            },
            Command::Callback { url } => self.process_callback(&url).await,
            Command::Password { command } => match command {
                PasswordCommand::Forgot { email } => self.password_forgot(&email).await,
                PasswordCommand::Reset { email, code } => self.password_reset(email, code).await,
            },
            Command::History { command } => match command {
                HistoryCommand::Playlists {
                    page,
                    page_size,
                    emotion,
                    favorites,
                } => self.history_playlists(page, page_size, emotion, favorites).await,
                HistoryCommand::Analyses {
                    page,
                    page_size,
                    emotion,
                } => self.history_analyses(page, page_size, emotion).await,
                HistoryCommand::Stats => self.history_stats().await,
            },
            Command::Playlists { command } => match command {
                PlaylistCommand::List { limit } => self.spotify_playlists(limit).await,
                PlaylistCommand::Create {
                    name,
                    description,
                    tracks,
                    public,
                } => self.create_spotify_playlist(name, description, tracks, public).await,
            },
        }
    }

    async fn login(&mut self, username_or_email: String) -> Result<()> {
        let password = read_line("Password: ")?;
        let outcome = self
            .state
            .login(&LoginRequest {
                username_or_email,
                password,
            })
            .await;
        match outcome {
            Outcome::Success(_) => {
                let name = self
                    .state
                    .user()
                    .map(|u| u.display_name())
                    .unwrap_or_else(|| "there".to_string());
                println!("Welcome back, {name}.");
            }
            Outcome::Failure(error) => println!("Sign-in failed: {error}"),
        }
        Ok(())
    }

    async fn register(
        &mut self,
        username: String,
        email: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<()> {
        let password = read_line("Password: ")?;
        let outcome = self
            .state
            .register(&RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            })
            .await;
        match outcome {
            Outcome::Success(_) => {
                println!("Account created. Sign in with `anima login` when you are ready.");
            }
            Outcome::Failure(error) => println!("Registration failed: {error}"),
        }
        Ok(())
    }

    async fn whoami(&self) -> Result<()> {
        if self.session.token().is_none() {
            println!("Not signed in.");
            return Ok(());
        }
        match self.auth.me().await {
            Ok(user) => {
                println!("{}", user.display_name());
                println!("  username:  {}", user.username);
                if let Some(email) = &user.email {
                    println!("  email:     {email}");
                }
                println!("  verified:  {}", user.is_verified);
                println!("  spotify:   {}", if user.spotify_connected { "linked" } else { "not linked" });
            }
            Err(e) => println!("Could not fetch the current user: {}", e.detail()),
        }
        Ok(())
    }

    async fn update_profile(
        &mut self,
        first_name: Option<String>,
        last_name: Option<String>,
        profile_picture: Option<String>,
    ) -> Result<()> {
        let mut patch = serde_json::Map::new();
        if let Some(v) = first_name {
            patch.insert("first_name".to_string(), v.into());
        }
        if let Some(v) = last_name {
            patch.insert("last_name".to_string(), v.into());
        }
        if let Some(v) = profile_picture {
            patch.insert("profile_picture".to_string(), v.into());
        }
        if patch.is_empty() {
            println!("Nothing to update.");
            return Ok(());
        }

        match self.auth.update_profile(&patch.into()).await {
            Ok(user) => {
                self.state.set_user(Some(user));
                println!("Profile updated.");
            }
            Err(e) => println!("Profile update failed: {}", e.detail()),
        }
        Ok(())
    }

    async fn spotify_login(&mut self) -> Result<()> {
        match self.auth.get_spotify_auth_url().await {
            Ok(url) => self.complete_oauth(&url).await,
            Err(e) => {
                println!("Could not start the Spotify flow: {}", e.detail());
                Ok(())
            }
        }
    }

    async fn spotify_link(&mut self) -> Result<()> {
        if self.session.token().is_none() {
            println!("Sign in first; linking attaches Spotify to an existing account.");
            return Ok(());
        }
        match self.auth.get_spotify_link_url().await {
            Ok(url) => self.complete_oauth(&url).await,
            Err(e) => {
                println!("Could not start the link flow: {}", e.detail());
                Ok(())
            }
        }
    }

    /// Shared tail of both Spotify flows: show the authorization URL, then
    /// consume the pasted redirect.
    async fn complete_oauth(&mut self, url: &str) -> Result<()> {
        println!("Open this URL in your browser and authorize the app:");
        println!("\n  {url}\n");
        let redirect = read_line("Paste the full redirect URL here: ")?;
        if redirect.is_empty() {
            println!("No redirect URL; aborting.");
            return Ok(());
        }
        self.process_callback(&redirect).await
    }

    async fn process_callback(&mut self, url: &str) -> Result<()> {
        let params = CallbackParams::from_url(url)
            .context("that does not look like a redirect URL")?;
        self.handler.handle(&mut self.state, &params).await;
        Ok(())
    }

    async fn spotify_disconnect(&mut self) -> Result<()> {
        match self.auth.disconnect_spotify().await {
            Ok(_) => {
                self.state.refresh_user().await;
                println!("Spotify disconnected.");
            }
            Err(e) => println!("Disconnect failed: {}", e.detail()),
        }
        Ok(())
    }

    async fn password_forgot(&self, email: &str) -> Result<()> {
        match self.auth.request_password_reset(email).await {
            Ok(Outcome::Success(_)) => {
                println!("Reset code sent to {email}. It is valid for 30 minutes.");
            }
            Ok(Outcome::Failure(error)) => println!("Could not send the code: {error}"),
            Err(e) => println!("Could not send the code: {}", e.detail()),
        }
        Ok(())
    }

    async fn password_reset(&self, email: String, code: String) -> Result<()> {
        let new_password = read_line("New password: ")?;
        let request = ResetPasswordRequest {
            email,
            code,
            new_password,
        };
        match self.auth.reset_password(&request).await {
            Ok(Outcome::Success(_)) => println!("Password changed. Sign in with the new one."),
            Ok(Outcome::Failure(error)) => println!("Could not change the password: {error}"),
            Err(e) => println!("Could not change the password: {}", e.detail()),
        }
        Ok(())
    }

    async fn history_playlists(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        emotion: Option<String>,
        favorites: bool,
    ) -> Result<()> {
        let filters = PlaylistFilters {
            page,
            page_size,
            emotion,
            is_favorite: favorites.then_some(true),
        };
        match self.history.get_playlists(&filters).await {
            Outcome::Success(playlists) => {
                if playlists.items.is_empty() {
                    println!("No saved playlists.");
                }
                for playlist in playlists.items {
                    let name = playlist.playlist_name.as_deref().unwrap_or("(unnamed)");
                    let emotion = playlist.emotion.as_deref().unwrap_or("-");
                    let star = if playlist.is_favorite { "*" } else { " " };
                    let when = playlist
                        .created_at
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    println!("{star} {name}  [{emotion}]  {when}");
                }
            }
            Outcome::Failure(error) => println!("Could not load playlists: {error}"),
        }
        Ok(())
    }

    async fn history_analyses(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        emotion: Option<String>,
    ) -> Result<()> {
        let filters = AnalysisFilters {
            page,
            page_size,
            emotion,
        };
        match self.history.get_analyses(&filters).await {
            Outcome::Success(analyses) => {
                if analyses.items.is_empty() {
                    println!("No analyses yet.");
                }
                for analysis in analyses.items {
                    let emotion = analysis.emotion.as_deref().unwrap_or("-");
                    let confidence = analysis
                        .confidence
                        .map(|c| format!("{:.0}%", c * 100.0))
                        .unwrap_or_default();
                    let when = analysis
                        .created_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    let saved = if analysis.has_saved_playlist { "saved" } else { "" };
                    println!("{when}  {emotion} {confidence}  {saved}");
                }
            }
            Outcome::Failure(error) => println!("Could not load analyses: {error}"),
        }
        Ok(())
    }

    async fn history_stats(&self) -> Result<()> {
        match self.history.get_stats().await {
            Outcome::Success(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
            Outcome::Failure(error) => println!("Could not load stats: {error}"),
        }
        Ok(())
    }

    async fn spotify_playlists(&self, limit: u32) -> Result<()> {
        match self.music.get_user_playlists(limit).await {
            Outcome::Success(playlists) => println!("{}", serde_json::to_string_pretty(&playlists)?),
            Outcome::Failure(error) => println!("Could not load Spotify playlists: {error}"),
        }
        Ok(())
    }

    async fn create_spotify_playlist(
        &self,
        name: String,
        description: String,
        tracks: Vec<String>,
        public: bool,
    ) -> Result<()> {
        let request = CreatePlaylistRequest {
            name,
            description,
            tracks,
            public,
        };
        match self.music.create_playlist(&request).await {
            Outcome::Success(_) => println!("Playlist created on Spotify."),
            Outcome::Failure(error) => println!("Could not create the playlist: {error}"),
        }
        Ok(())
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
