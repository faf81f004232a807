//! Rule tables combining two levels into a verdict.

use crate::{BufferLevel, EnergyLevel, Level, PopularityLevel, TieLevel};

/// A node's ability to carry traffic, from its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ability {
    VeryBad,
    Bad,
    Good,
    Perfect,
}

/// How socially worthwhile a node is as a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SocialImportance {
    Bad,
    Good,
    Perfect,
}

impl SocialImportance {
    /// Good or Perfect → 1.
    pub fn binary(self) -> u8 {
        match self {
            Self::Good | Self::Perfect => 1,
            Self::Bad => 0,
        }
    }
}

/// Whether now is a good moment to hand a message to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferOpportunity {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl TransferOpportunity {
    /// Medium and above → 1.
    pub fn binary(self) -> u8 {
        match self {
            Self::Medium | Self::High | Self::VeryHigh => 1,
            Self::Low => 0,
        }
    }

    /// Graded weight in `[0, 1]` used to scale the learning update.
    pub fn weight(self) -> f64 {
        match self {
            Self::Low => 0.25,
            Self::Medium => 0.5,
            Self::High => 0.75,
            Self::VeryHigh => 1.0,
        }
    }
}

/// Forwarding priority of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessagePriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl MessagePriority {
    /// High or Urgent → 1.0.
    pub fn binary(self) -> f64 {
        match self {
            Self::High | Self::Urgent => 1.0,
            Self::Normal | Self::Low => 0.0,
        }
    }
}

/// Ability from (buffer, energy).
pub fn evaluate_ability(buffer: BufferLevel, energy: EnergyLevel) -> Ability {
    use BufferLevel as B;
    use EnergyLevel as E;

    match (buffer, energy) {
        (B::High, E::High) => Ability::Perfect,
        (B::High, E::Medium) => Ability::Perfect,
        (B::High, E::Low) => Ability::Bad,
        (B::Medium, E::High) => Ability::Perfect,
        (B::Medium, E::Medium) => Ability::Good,
        (B::Medium, E::Low) => Ability::Bad,
        (B::Low, E::High) => Ability::Good,
        (B::Low, E::Medium) => Ability::Bad,
        (B::Low, E::Low) => Ability::VeryBad,
    }
}

/// Social importance from (popularity, tie strength).
pub fn evaluate_social(popularity: PopularityLevel, tie: TieLevel) -> SocialImportance {
    use PopularityLevel as P;
    use TieLevel as T;

    match (popularity, tie) {
        (P::Fast, T::Good) => SocialImportance::Perfect,
        (P::Fast, T::Fair) => SocialImportance::Good,
        (P::Medium, T::Fair | T::Good) => SocialImportance::Good,
        (P::Slow, T::Good) => SocialImportance::Good,
        _ => SocialImportance::Bad,
    }
}

/// Transfer opportunity from (ability, social importance).
pub fn evaluate_transfer(ability: Ability, social: SocialImportance) -> TransferOpportunity {
    use Ability as A;
    use SocialImportance as S;

    match (ability, social) {
        (A::Perfect, S::Good | S::Perfect) => TransferOpportunity::VeryHigh,
        (A::Perfect, S::Bad) => TransferOpportunity::Medium,
        (A::Good, S::Perfect) => TransferOpportunity::High,
        (A::Good, S::Good) => TransferOpportunity::High,
        (A::Good, S::Bad) => TransferOpportunity::Low,
        (A::Bad, S::Perfect) => TransferOpportunity::Medium,
        _ => TransferOpportunity::Low,
    }
}

/// Message priority from (normalized-TTL level, hop level).
///
/// The TTL level is computed on `1 − remaining/max`, so `Small` means plenty
/// of time left.
pub fn message_priority(ttl: Level, hops: Level) -> MessagePriority {
    use Level as L;

    match (ttl, hops) {
        (L::Small, L::Large) => MessagePriority::Urgent,
        (L::Small, L::Medium) => MessagePriority::High,
        (L::Small, L::Small) => MessagePriority::Normal,
        (L::Medium, L::Large) => MessagePriority::High,
        (L::Medium, L::Medium) => MessagePriority::Normal,
        (L::Medium, L::Small) => MessagePriority::Low,
        (L::Large, L::Large) => MessagePriority::High,
        (L::Large, L::Medium) => MessagePriority::Normal,
        (L::Large, L::Small) => MessagePriority::Normal,
    }
}
