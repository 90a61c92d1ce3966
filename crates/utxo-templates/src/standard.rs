//! The registry of standard templates and classification by priority.

use utxo_primitives::ec::PubKey;
use utxo_script::{KeyId, Network, Script, ScriptChunk, ScriptId, TxDestination};

use crate::{
    FastCheck, MultisigParams, MultisigTemplate, NullDataTemplate, PubKeyHashTemplate,
    PubKeyTemplate, ScriptHashTemplate, ScriptTemplate, TxOutType, WitProgramParams,
    WitPubKeyHashTemplate, WitScriptHashTemplate, WitnessTemplate,
};

/// Any one of the standard templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardTemplate {
    PubKeyHash(PubKeyHashTemplate),
    ScriptHash(ScriptHashTemplate),
    PubKey(PubKeyTemplate),
    Multisig(MultisigTemplate),
    NullData(NullDataTemplate),
    Witness(WitnessTemplate),
    WitPubKeyHash(WitPubKeyHashTemplate),
    WitScriptHash(WitScriptHashTemplate),
}

impl StandardTemplate {
    fn inner(&self) -> &dyn ScriptTemplate {
        match self {
            StandardTemplate::PubKeyHash(t) => t,
            StandardTemplate::ScriptHash(t) => t,
            StandardTemplate::PubKey(t) => t,
            StandardTemplate::Multisig(t) => t,
            StandardTemplate::NullData(t) => t,
            StandardTemplate::Witness(t) => t,
            StandardTemplate::WitPubKeyHash(t) => t,
            StandardTemplate::WitScriptHash(t) => t,
        }
    }
}

impl ScriptTemplate for StandardTemplate {
    fn tx_out_type(&self) -> TxOutType {
        self.inner().tx_out_type()
    }

    fn fast_check_locking_script(&self, script: &Script) -> FastCheck {
        self.inner().fast_check_locking_script(script)
    }

    fn check_locking_script_core(&self, script: &Script, ops: &[ScriptChunk]) -> bool {
        self.inner().check_locking_script_core(script, ops)
    }

    fn fast_check_unlocking_script(&self, unlocking: &Script) -> FastCheck {
        self.inner().fast_check_unlocking_script(unlocking)
    }

    fn check_unlocking_script_core(
        &self,
        network: &Network,
        unlocking: &Script,
        ops: &[ScriptChunk],
        locking: Option<&Script>,
    ) -> bool {
        self.inner().check_unlocking_script_core(network, unlocking, ops, locking)
    }
}

macro_rules! impl_from_template {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for StandardTemplate {
                fn from(t: $ty) -> Self {
                    StandardTemplate::$variant(t)
                }
            }
        )*
    };
}

impl_from_template!(
    PubKeyHash(PubKeyHashTemplate),
    ScriptHash(ScriptHashTemplate),
    PubKey(PubKeyTemplate),
    Multisig(MultisigTemplate),
    NullData(NullDataTemplate),
    Witness(WitnessTemplate),
    WitPubKeyHash(WitPubKeyHashTemplate),
    WitScriptHash(WitScriptHashTemplate),
);

/// Typed parameters of a classified locking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LockingScriptParams {
    PubKeyHash(KeyId),
    ScriptHash(ScriptId),
    PubKey(PubKey),
    Multisig(MultisigParams),
    NullData(Vec<Vec<u8>>),
    Witness(WitProgramParams),
}

/// One instance of each standard template, in classification order:
/// pubkey-hash, script-hash, pubkey, multisig, null-data, witness.
///
/// A locking script is classified by the first template that accepts it.
/// The specialized witness templates are reachable through
/// [`StandardTemplate`] but do not take part in classification; the
/// generic witness template covers their scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandardScripts {
    templates: Vec<StandardTemplate>,
}

impl StandardScripts {
    /// A registry whose null-data limit follows `network`.
    pub fn new(network: &Network) -> Self {
        StandardScripts {
            templates: vec![
                PubKeyHashTemplate.into(),
                ScriptHashTemplate.into(),
                PubKeyTemplate.into(),
                MultisigTemplate.into(),
                NullDataTemplate::for_network(network).into(),
                WitnessTemplate.into(),
            ],
        }
    }

    /// The registered templates, in classification order.
    pub fn templates(&self) -> &[StandardTemplate] {
        &self.templates
    }

    /// The first template accepting `script`.
    pub fn template_for(&self, script: &Script) -> Option<&StandardTemplate> {
        self.templates.iter().find(|t| t.check_locking_script(script))
    }

    /// The type of the first matching template, or `Nonstandard`.
    pub fn classify(&self, script: &Script) -> TxOutType {
        let tx_out_type = self
            .template_for(script)
            .map_or(TxOutType::Nonstandard, |t| t.tx_out_type());
        tracing::trace!("classified {} byte script as {}", script.len(), tx_out_type);
        tx_out_type
    }

    /// `true` if any registered template matches.
    pub fn is_standard_locking_script(&self, script: &Script) -> bool {
        self.template_for(script).is_some()
    }

    /// Parameters of `script` as extracted by its classifying template.
    ///
    /// Pay-to-pubkey keys are checked for format only, not curve membership.
    pub fn extract_locking_params(&self, script: &Script) -> Option<LockingScriptParams> {
        match self.template_for(script)? {
            StandardTemplate::PubKeyHash(t) => {
                t.extract_locking_script_parameters(script).map(LockingScriptParams::PubKeyHash)
            }
            StandardTemplate::ScriptHash(t) => {
                t.extract_locking_script_parameters(script).map(LockingScriptParams::ScriptHash)
            }
            StandardTemplate::PubKey(t) => t
                .extract_locking_script_parameters(script, false)
                .map(LockingScriptParams::PubKey),
            StandardTemplate::Multisig(t) => {
                t.extract_locking_script_parameters(script).map(LockingScriptParams::Multisig)
            }
            StandardTemplate::NullData(t) => {
                t.extract_locking_script_parameters(script).map(LockingScriptParams::NullData)
            }
            StandardTemplate::Witness(_)
            | StandardTemplate::WitPubKeyHash(_)
            | StandardTemplate::WitScriptHash(_) => WitnessTemplate
                .extract_locking_script_parameters(script)
                .map(LockingScriptParams::Witness),
        }
    }

    /// The hash destination `script` pays to, for pubkey-hash, script-hash
    /// and version 0 witness key/script-hash scripts.
    pub fn extract_destination(&self, script: &Script) -> Option<TxDestination> {
        match self.template_for(script)? {
            StandardTemplate::PubKeyHash(t) => t.extract_locking_script_parameters(script).map(Into::into),
            StandardTemplate::ScriptHash(t) => t.extract_locking_script_parameters(script).map(Into::into),
            StandardTemplate::Witness(_)
            | StandardTemplate::WitPubKeyHash(_)
            | StandardTemplate::WitScriptHash(_) => WitnessTemplate.extract_destination(script),
            _ => None,
        }
    }

    /// `true` if `unlocking` is a standard unlocking script.
    ///
    /// With `locking`, the unlocking script is checked against the template
    /// that classifies `locking`, including its cross-checks. Without it,
    /// any template accepting `unlocking` suffices.
    pub fn check_unlocking_script(
        &self,
        network: &Network,
        unlocking: &Script,
        locking: Option<&Script>,
    ) -> bool {
        match locking {
            Some(locking) => match self.template_for(locking) {
                Some(t) => t.check_unlocking_script(network, unlocking, Some(locking)),
                None => false,
            },
            None => self
                .templates
                .iter()
                .any(|t| t.check_unlocking_script(network, unlocking, None)),
        }
    }
}

impl Default for StandardScripts {
    fn default() -> Self {
        Self::new(&Network::default())
    }
}
