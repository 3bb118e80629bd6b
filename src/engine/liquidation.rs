//! Liquidation of undercollateralized accounts.
//!
//! A third party repays part of a target's debt with its own stablecoin and
//! receives the equivalent collateral plus a bonus. The seized collateral is
//! paid out to the liquidator directly; it is not credited as a deposit.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::core::health::HealthFactor;
use crate::engine::dsc_engine::DscEngine;
use crate::error::{Error, Result};
use crate::events::{EngineEvent, LiquidatedEvent};
use crate::utils::address::Address;
use crate::utils::math::{safe_add, safe_mul_div};
use crate::utils::validation::validate_non_zero;

/// Result of a successful liquidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOutcome {
    /// Collateral token seized
    pub collateral_token: Address,
    /// Account liquidated
    pub target: Address,
    /// Debt repaid by the liquidator
    pub debt_covered: U256,
    /// Collateral equal in value to the debt covered
    pub base_collateral: U256,
    /// Collateral paid on top of the base, after the cap
    pub bonus_collateral: U256,
    /// Total collateral transferred to the liquidator
    pub collateral_seized: U256,
    /// Whether the reward was cut down to the target's collateral value
    pub capped: bool,
    /// Target's health factor before
    pub starting_health_factor: HealthFactor,
    /// Target's health factor after
    pub ending_health_factor: HealthFactor,
}

impl DscEngine {
    /// Repay `debt_to_cover` of `target`'s debt and seize its collateral.
    ///
    /// Only accounts below the minimum health factor can be liquidated, and
    /// the liquidation must raise their health factor.
    pub fn liquidate(
        &self,
        liquidator: &Address,
        collateral_token: &Address,
        target: &Address,
        debt_to_cover: U256,
    ) -> Result<LiquidationOutcome> {
        let outcome = self.atomically("liquidate", |engine| {
            engine.liquidate_inner(liquidator, collateral_token, target, debt_to_cover)
        })?;

        tracing::info!(
            liquidator = %liquidator.short(),
            target = %target.short(),
            token = %collateral_token.short(),
            debt_covered = %outcome.debt_covered,
            seized = %outcome.collateral_seized,
            capped = outcome.capped,
            starting = %outcome.starting_health_factor,
            ending = %outcome.ending_health_factor,
            "position liquidated"
        );
        Ok(outcome)
    }

    fn liquidate_inner(
        &self,
        liquidator: &Address,
        collateral_token: &Address,
        target: &Address,
        debt_to_cover: U256,
    ) -> Result<LiquidationOutcome> {
        validate_non_zero(debt_to_cover)?;
        self.registry.price_feed(collateral_token)?;

        let starting_health_factor = self.health_factor(target)?;
        if starting_health_factor.is_healthy(self.config.min_health()) {
            return Err(Error::HealthFactorOk(starting_health_factor));
        }

        let base_collateral = self.token_amount_from_usd(collateral_token, debt_to_cover)?;
        let bonus = safe_mul_div(
            base_collateral,
            self.config.bonus(),
            self.config.liquidation_denominator(),
            "liquidation bonus",
        )?;
        let requested = safe_add(base_collateral, bonus, "liquidation reward")?;

        // The cap is the target's value across all tokens, priced in this one.
        let total_collateral_usd = self.account_collateral_value(target)?;
        let cap = self.token_amount_from_usd(collateral_token, total_collateral_usd)?;
        let capped = requested > cap;
        let collateral_seized = requested.min(cap);

        tracing::debug!(
            %base_collateral,
            %bonus,
            %cap,
            %collateral_seized,
            "liquidation reward computed"
        );

        self.redeem_from(target, liquidator, collateral_token, collateral_seized)?;
        self.burn_from(liquidator, target, debt_to_cover)?;

        let ending_health_factor = self.health_factor(target)?;
        if ending_health_factor <= starting_health_factor {
            return Err(Error::HealthFactorNotImproved {
                starting: starting_health_factor,
                ending: ending_health_factor,
            });
        }
        self.assert_healthy(liquidator)?;

        self.emit(EngineEvent::Liquidated(LiquidatedEvent {
            liquidator: *liquidator,
            target: *target,
            token: *collateral_token,
            debt_covered: debt_to_cover,
            collateral_seized,
        }));

        Ok(LiquidationOutcome {
            collateral_token: *collateral_token,
            target: *target,
            debt_covered: debt_to_cover,
            base_collateral,
            bonus_collateral: collateral_seized.saturating_sub(base_collateral),
            collateral_seized,
            capped,
            starting_health_factor,
            ending_health_factor,
        })
    }
}
