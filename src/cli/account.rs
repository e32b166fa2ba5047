use std::io::Write;

use clap::Args;
use harvest::session::NewUser;

use super::{CliStore, write_line};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "HARVEST_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    /// Given name
    #[arg(long)]
    first_name: String,

    /// Family name
    #[arg(long)]
    last_name: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Password, at least 6 characters
    #[arg(long, env = "HARVEST_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) fn login(mut store: CliStore, args: &LoginArgs, out: &mut impl Write) -> Result<(), String> {
    let user = store
        .session_mut()
        .login(&args.email, &args.password)
        .map_err(|error| format!("login failed: {error}"))?;

    write_line(out, &format!("Signed in as {} <{}>", user.full_name(), user.email))
}

pub(crate) fn register(
    mut store: CliStore,
    args: RegisterArgs,
    out: &mut impl Write,
) -> Result<(), String> {
    let user = store
        .session_mut()
        .register(NewUser {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            password: args.password,
        })
        .map_err(|error| format!("registration failed: {error}"))?;

    write_line(
        out,
        &format!("Registered and signed in as {} <{}>", user.full_name(), user.email),
    )
}

pub(crate) fn logout(mut store: CliStore, out: &mut impl Write) -> Result<(), String> {
    let was_signed_in = store.session().is_authenticated();

    store
        .session_mut()
        .logout()
        .map_err(|error| format!("logout failed: {error}"))?;

    if was_signed_in {
        write_line(out, "Signed out")
    } else {
        write_line(out, "Not signed in")
    }
}

pub(crate) fn whoami(store: &CliStore, out: &mut impl Write) -> Result<(), String> {
    let Some(user) = store.session().current_user() else {
        return write_line(out, "Not signed in");
    };

    write_line(out, &format!("id:    {}", user.id))?;
    write_line(out, &format!("name:  {}", user.full_name()))?;
    write_line(out, &format!("email: {}", user.email))?;
    write_line(out, &format!("phone: {}", user.phone))
}
