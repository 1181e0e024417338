use super::{print_json, LookupKind};
use crate::{api::CredentialProvider, session::SessionStore};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if the list cannot be fetched.
pub async fn handle<P: CredentialProvider>(
    store: &SessionStore<P>,
    kind: LookupKind,
) -> Result<()> {
    let context = || format!("failed to fetch {kind:?} list");

    match kind {
        LookupKind::Drps => print_json(&store.get_drps().await.with_context(context)?),
        LookupKind::Polos => print_json(&store.get_polos().await.with_context(context)?),
        LookupKind::Eixos => print_json(&store.get_eixos().await.with_context(context)?),
        LookupKind::Cursos => print_json(&store.get_cursos().await.with_context(context)?),
        LookupKind::Pis => print_json(&store.get_pis().await.with_context(context)?),
        LookupKind::Tags => print_json(&store.get_tags().await.with_context(context)?),
    }
}
