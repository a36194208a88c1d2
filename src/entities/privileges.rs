//! `PrivilegedServices` (spec.md §3): the privileged-roles record mutated
//! wholesale by the `Empower` host call.

use std::collections::BTreeMap;

use crate::entities::service::ServiceId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivilegedServices {
    pub manager_service_id: ServiceId,
    pub assign_service_id: ServiceId,
    pub designate_service_id: ServiceId,
    pub amount_of_gas_per_service_id: BTreeMap<ServiceId, u64>,
}
