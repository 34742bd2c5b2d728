//! Fallback datasets shown when a live fetch fails.

use crate::models::*;

fn monthly(name: &str, consumption: f32, production: f32) -> MonthlyEnergy {
    MonthlyEnergy { name: name.into(), consumption, production }
}

fn temp(name: &str, temp: f32) -> TemperatureReading {
    TemperatureReading { name: name.into(), temp }
}

pub fn monthly_energy() -> Vec<MonthlyEnergy> {
    vec![
        monthly("Jan", 4000.0, 2400.0),
        monthly("Feb", 3000.0, 2210.0),
        monthly("Mar", 2000.0, 2290.0),
        monthly("Apr", 2780.0, 3000.0),
        monthly("May", 1890.0, 3200.0),
        monthly("Jun", 2390.0, 3500.0),
        monthly("Jul", 3490.0, 4100.0),
    ]
}

pub fn daily_temperature() -> Vec<TemperatureReading> {
    vec![
        temp("00:00", 22.0),
        temp("04:00", 20.0),
        temp("08:00", 25.0),
        temp("12:00", 30.0),
        temp("16:00", 28.0),
        temp("20:00", 24.0),
        temp("23:59", 22.0),
    ]
}

pub fn weekly_alerts() -> Vec<DailyAlerts> {
    [("Mon", 2.0), ("Tue", 0.0), ("Wed", 1.0), ("Thu", 0.0), ("Fri", 3.0), ("Sat", 0.0), ("Sun", 0.0)]
        .into_iter()
        .map(|(name, alerts)| DailyAlerts { name: name.into(), alerts })
        .collect()
}

pub fn solar() -> Vec<SolarReading> {
    [
        ("06:00", 0.2, 18.0),
        ("08:00", 1.2, 22.0),
        ("10:00", 2.5, 26.0),
        ("12:00", 3.2, 30.0),
        ("14:00", 3.0, 32.0),
        ("16:00", 2.0, 28.0),
        ("18:00", 0.8, 24.0),
        ("20:00", 0.1, 20.0),
    ]
    .into_iter()
    .map(|(time, output, temp)| SolarReading { time: time.into(), output, temp })
    .collect()
}

/// Panel temperature series; the energy temperature tab reuses the solar readings.
pub fn panel_temperature() -> Vec<TemperatureReading> {
    solar().into_iter().map(|s| temp(&s.time, s.temp)).collect()
}

pub fn rb_cells() -> Vec<CellCharge> {
    [("Cell A", 85.0), ("Cell B", 92.0), ("Cell C", 78.0), ("Cell D", 89.0), ("Cell E", 94.0), ("Cell F", 63.0)]
        .into_iter()
        .map(|(name, charge)| CellCharge { name: name.into(), charge })
        .collect()
}

pub fn frequency() -> Vec<FrequencyReading> {
    [
        ("00:00", 50.1),
        ("03:00", 49.9),
        ("06:00", 50.0),
        ("09:00", 50.2),
        ("12:00", 50.1),
        ("15:00", 49.8),
        ("18:00", 50.0),
        ("21:00", 50.1),
    ]
    .into_iter()
    .map(|(time, value)| FrequencyReading { time: time.into(), value })
    .collect()
}

pub fn rfid_users() -> Vec<RfidUser> {
    [
        ("RFID-001", "Jean Dupont", "Admin", "10 Apr 2025, 09:15", "active"),
        ("RFID-002", "Marie Martin", "Manager", "10 Apr 2025, 08:30", "active"),
        ("RFID-003", "Pierre Durand", "Technician", "09 Apr 2025, 16:45", "active"),
        ("RFID-004", "Sophie Lefebvre", "Security", "10 Apr 2025, 07:20", "active"),
        ("RFID-005", "Thomas Bernard", "Technician", "08 Apr 2025, 14:10", "inactive"),
    ]
    .into_iter()
    .map(|(id, name, role, last_access, status)| RfidUser {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        last_access: last_access.into(),
        status: status.into(),
    })
    .collect()
}

pub fn security_alerts() -> Vec<SecurityAlert> {
    [
        ("ALT-001", "Unauthorized", "Zone A", "10 Apr 2025, 02:15", "critical"),
        ("ALT-002", "Invalid RFID", "Zone B", "09 Apr 2025, 23:30", "warning"),
        ("ALT-003", "Door Forced", "Zone C", "08 Apr 2025, 19:45", "critical"),
        ("ALT-004", "Motion Detected", "Zone A", "08 Apr 2025, 22:20", "warning"),
        ("ALT-005", "Invalid RFID", "Zone D", "07 Apr 2025, 15:10", "warning"),
    ]
    .into_iter()
    .map(|(id, kind, zone, time, status)| SecurityAlert {
        id: id.into(),
        kind: kind.into(),
        zone: zone.into(),
        time: time.into(),
        status: status.into(),
    })
    .collect()
}

pub fn access_stats() -> Vec<AccessStats> {
    [("Mon", 42.0, 2.0), ("Tue", 38.0, 0.0), ("Wed", 45.0, 1.0), ("Thu", 40.0, 0.0), ("Fri", 35.0, 3.0), ("Sat", 15.0, 0.0), ("Sun", 5.0, 0.0)]
        .into_iter()
        .map(|(day, authorized, unauthorized)| AccessStats { day: day.into(), authorized, unauthorized })
        .collect()
}

pub fn maintenance() -> Vec<MaintenanceItem> {
    [
        ("EQ-001", "Solar Panel Array A", "15 Mar 2025", "15 Jun 2025", "good", 70),
        ("EQ-002", "Inverter System", "01 Apr 2025", "01 Jul 2025", "good", 80),
        ("EQ-003", "Battery Storage Unit", "10 Feb 2025", "10 May 2025", "attention", 25),
        ("EQ-004", "Monitoring Station", "22 Mar 2025", "22 Jun 2025", "good", 65),
        ("EQ-005", "RFID Security System", "05 Jan 2025", "05 Apr 2025", "urgent", 5),
    ]
    .into_iter()
    .map(|(id, name, last, next, status, progress)| MaintenanceItem {
        id: id.into(),
        name: name.into(),
        last_maintenance: last.into(),
        next_maintenance: next.into(),
        status: status.into(),
        progress,
    })
    .collect()
}

pub fn inventory() -> Vec<InventoryItem> {
    [
        ("INV-001", "Solar Panels (250W)", 15, 5, "good"),
        ("INV-002", "Battery Cells", 8, 10, "low"),
        ("INV-003", "Inverter Components", 3, 5, "low"),
        ("INV-004", "Mounting Hardware", 25, 15, "good"),
        ("INV-005", "RFID Cards", 50, 20, "good"),
    ]
    .into_iter()
    .map(|(id, name, stock, min_stock, status)| InventoryItem {
        id: id.into(),
        name: name.into(),
        stock,
        min_stock,
        status: status.into(),
    })
    .collect()
}

/// Seed accounts of the in-memory user service, also the users page fallback.
pub fn users() -> Vec<User> {
    [
        (1, "admin@example.com", "Admin", "User", true, true),
        (2, "manager@example.com", "Manager", "User", true, false),
        (3, "user@example.com", "Regular", "User", true, false),
        (4, "inactive@example.com", "Inactive", "User", false, false),
    ]
    .into_iter()
    .map(|(id, email, first, last, is_active, is_superuser)| User {
        id,
        email: email.into(),
        first_name: first.into(),
        last_name: last.into(),
        is_active,
        is_superuser,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_populated() {
        assert_eq!(monthly_energy().len(), 7);
        assert_eq!(solar().len(), panel_temperature().len());
        assert_eq!(rb_cells().len(), 6);
        assert_eq!(security_alerts().iter().filter(|a| a.is_critical()).count(), 2);
        assert_eq!(inventory().iter().filter(|i| i.is_low()).count(), 2);
    }

    #[test]
    fn test_seed_users_have_unique_ids() {
        let mut ids: Vec<u64> = users().iter().map(|u| u.id).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
