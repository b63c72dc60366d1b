use log::{debug, info};
use quorum_core::command::GovernanceEvent;
use quorum_core::error::GovernanceError;
use quorum_core::id::AssetId;
use quorum_core::proposal::GovernanceAction;
use quorum_registry::AssetRegistry;

/// Runs the side effect of an approved proposal.
///
/// The action set is closed: new actions are added as `GovernanceAction`
/// variants. Unrecognized codes are accepted and do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionExecutor;

impl ActionExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Check that `execute` would succeed, without touching the registry
    pub fn check<R: AssetRegistry + ?Sized>(
        &self,
        action: GovernanceAction,
        asset: &AssetId,
        _params: &[String],
        registry: &R,
    ) -> Result<(), GovernanceError> {
        match action {
            GovernanceAction::DestroyAsset => {
                if !registry.asset_exists(asset) {
                    return Err(GovernanceError::AssetNotFound(*asset));
                }
                Ok(())
            }
            GovernanceAction::Unrecognized(_) => Ok(()),
        }
    }

    /// Run an action against its target asset
    ///
    /// # Parameters
    /// * `action` - The action selected by the proposal's code
    /// * `asset` - The proposal's target asset
    /// * `params` - The proposal's parameters
    /// * `registry` - The registry holding the asset
    ///
    /// # Returns
    /// Events describing the side effects, empty for no-op actions
    pub fn execute<R: AssetRegistry + ?Sized>(
        &self,
        action: GovernanceAction,
        asset: &AssetId,
        params: &[String],
        registry: &mut R,
    ) -> Result<Vec<GovernanceEvent>, GovernanceError> {
        self.check(action, asset, params, &*registry)?;

        match action {
            GovernanceAction::DestroyAsset => {
                registry.destroy_asset(asset)?;
                info!("Destroyed {} by approved proposal", asset);
                Ok(vec![GovernanceEvent::AssetDestroyed { asset: *asset }])
            }
            GovernanceAction::Unrecognized(code) => {
                debug!("No action registered for code {} on {}", code, asset);
                Ok(Vec::new())
            }
        }
    }
}
