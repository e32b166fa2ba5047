use std::io::Write;

use harvest::receipt;

use super::CliStore;

pub(crate) fn run(store: &CliStore, out: &mut impl Write) -> Result<(), String> {
    receipt::write_basket(out, store.basket())
        .map_err(|error| format!("failed to write basket: {error}"))
}
