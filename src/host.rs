//! The marker tool as seen by a host UI.
//!
//! A host supplies the current selection and stores the run sequence; the
//! tool turns button clicks and palette choices into toggle requests. Which
//! parts of the tool are usable is decided once, when the tool is built from
//! the host's [`Capabilities`].

use tracing::{debug, warn};

use crate::error::{Capability, MarkerError, Result};
use crate::marker::{
    MarkerEditor, Palette, RunSequence, Selection, StyleId, ToggleAction, ToggleEngine,
    ToggleOutcome,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub current_range: bool,
    pub palette: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            current_range: true,
            palette: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            current_range: false,
            palette: false,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::CurrentRange => self.current_range,
            Capability::Palette => self.palette,
        }
    }

    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(MarkerError::CapabilityMissing(capability))
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// What the tool needs from the surrounding editor.
pub trait MarkerHost {
    fn capabilities(&self) -> Capabilities;

    /// The selection to act on. `None` when the host has no selection at all.
    fn current_range(&self) -> Option<Selection>;

    fn runs(&self) -> &RunSequence;

    /// Replace the runs and restore the selection in one step.
    fn commit(&mut self, outcome: ToggleOutcome);
}

impl MarkerHost for MarkerEditor {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn current_range(&self) -> Option<Selection> {
        Some(self.current_selection())
    }

    fn runs(&self) -> &RunSequence {
        MarkerEditor::runs(self)
    }

    fn commit(&mut self, outcome: ToggleOutcome) {
        MarkerEditor::commit(self, outcome);
    }
}

/// Button plus colour palette, driving a [`ToggleEngine`].
#[derive(Clone, Debug)]
pub struct MarkerTool<'p> {
    engine: ToggleEngine<'p>,
    capabilities: Capabilities,
    palette_open: bool,
    active: Option<StyleId>,
}

impl<'p> MarkerTool<'p> {
    /// Build the tool for a host, switching off what the host cannot support.
    pub fn negotiate(palette: &'p Palette, capabilities: Capabilities) -> Self {
        if !capabilities.palette {
            warn!("host has no palette support, colour choices disabled");
        }
        if !capabilities.current_range {
            warn!("host cannot report the current range, button clicks disabled");
        }
        Self {
            engine: ToggleEngine::new(palette),
            capabilities,
            palette_open: false,
            active: None,
        }
    }

    pub fn palette(&self) -> &'p Palette {
        self.engine.palette()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn palette_enabled(&self) -> bool {
        self.capabilities.palette
    }

    pub fn is_palette_open(&self) -> bool {
        self.palette_open
    }

    /// Pointer entered the button: show the palette if there is one.
    pub fn hover(&mut self) -> bool {
        if !self.palette_enabled() {
            return false;
        }
        self.palette_open = true;
        true
    }

    pub fn hide_palette(&mut self) {
        self.palette_open = false;
    }

    /// Whether the last [`check_state`](Self::check_state) found a marker.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_style(&self) -> Option<StyleId> {
        self.active
    }

    /// Wrap or unwrap `range` (or the host's current range) with `style`.
    ///
    /// `style` defaults to the palette default. With `force_remove` the
    /// enclosing marker is removed whatever its style.
    pub fn surround<H: MarkerHost + ?Sized>(
        &mut self,
        host: &mut H,
        range: Option<Selection>,
        style: Option<StyleId>,
        force_remove: bool,
    ) -> Result<ToggleAction> {
        let range = match range {
            Some(range) => range,
            None => {
                self.capabilities.require(Capability::CurrentRange)?;
                match host.current_range() {
                    Some(range) => range,
                    None => return Ok(ToggleAction::Noop),
                }
            }
        };
        let style = style.unwrap_or_else(|| self.palette().default_style());
        let outcome = self.engine.toggle(host.runs(), range, style, force_remove)?;
        let action = outcome.action;
        debug!(?action, ?range, "marker tool applied toggle");
        if !action.is_noop() {
            host.commit(outcome);
        }
        self.check_state(host);
        Ok(action)
    }

    /// The button itself: strip whatever marker encloses the selection.
    pub fn click_button<H: MarkerHost + ?Sized>(&mut self, host: &mut H) -> Result<ToggleAction> {
        self.capabilities.require(Capability::CurrentRange)?;
        let range = host.current_range();
        let default = self.palette().default_style();
        let action = match range {
            Some(range) => self.surround(host, Some(range), Some(default), true)?,
            None => ToggleAction::Noop,
        };
        self.hide_palette();
        Ok(action)
    }

    /// A colour in the palette: toggle it on the current selection.
    pub fn pick_color<H: MarkerHost + ?Sized>(
        &mut self,
        host: &mut H,
        style: StyleId,
    ) -> Result<ToggleAction> {
        self.capabilities.require(Capability::Palette)?;
        self.hide_palette();
        self.surround(host, None, Some(style), false)
    }

    /// Refresh the active state from the host's selection.
    pub fn check_state<H: MarkerHost + ?Sized>(&mut self, host: &H) -> Option<StyleId> {
        let palette = self.palette();
        self.active = host.current_range().and_then(|range| {
            palette.iter().find_map(|entry| {
                host.runs()
                    .find_enclosing_run_with_style(&range, entry.id)
                    .map(|_| entry.id)
            })
        });
        self.active
    }
}
