//! Static translation tables for the three interface languages.
//!
//! Lookups never fail: a key missing from the active dictionary is returned verbatim.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Fr,
    En,
    Ar,
}

impl Language {
    pub const ALL: &[Language] = &[Language::Fr, Language::En, Language::Ar];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-fr" => Some(Language::Fr),
            "en" | "en-us" | "en-gb" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Native name, as listed in the language picker.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::En => "English",
            Language::Ar => "العربية",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    fn dictionary(&self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            Language::Fr => &FR,
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.native_name())
    }
}

/// Active-language lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Localized string for `key`, or `key` itself when the dictionary lacks it.
    pub fn translate<'k>(&self, key: &'k str) -> &'k str {
        self.language.dictionary().get(key).copied().unwrap_or(key)
    }

    /// Shorthand for [`Translator::translate`].
    pub fn t<'k>(&self, key: &'k str) -> &'k str {
        self.translate(key)
    }
}

static FR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Navigation
        ("dashboard", "Tableau de bord"),
        ("energy", "Consommation d'énergie"),
        ("security", "Sécurité"),
        ("material", "Matériel"),
        ("users", "Gestion des utilisateurs"),
        // Auth
        ("welcome", "Bienvenue chez Mobilis"),
        ("login", "Connexion"),
        ("email", "Email"),
        ("password", "Mot de passe"),
        ("role", "Rôle"),
        ("admin", "Administrateur"),
        ("manager", "Gestionnaire"),
        ("user", "Utilisateur"),
        ("remember", "Se souvenir de moi"),
        ("forgot", "Mot de passe oublié?"),
        ("signin", "Se connecter"),
        ("logged_in", "Connexion réussie"),
        ("invalid_credentials", "Identifiants invalides"),
        ("fill_required", "Veuillez remplir tous les champs obligatoires"),
        ("session_checking", "Vérification de la session…"),
        // Energy
        ("solar_panels", "Panneaux solaires"),
        ("temperature", "Température"),
        ("rb_cells", "Cellules RB"),
        ("frequency", "Fréquence"),
        ("consumption", "Consommation"),
        ("production", "Production"),
        ("efficiency", "Efficacité"),
        ("charge", "Charge"),
        ("decision", "Décision"),
        ("monitoring", "Surveillance"),
        ("current", "Actuel"),
        // Security
        ("rfid_users", "Utilisateurs RFID"),
        ("alerts", "Alertes"),
        ("stats", "Statistiques"),
        ("attempts", "Tentatives (Alertes de vol)"),
        ("last_access", "Dernier accès"),
        ("type", "Type"),
        ("zone", "Zone"),
        ("time", "Heure"),
        ("authorized", "Autorisés"),
        ("unauthorized", "Non autorisés"),
        ("critical", "Critique"),
        ("warning", "Avertissement"),
        // Material
        ("maintenance", "Maintenance du matériel"),
        ("management", "Gestion du matériel"),
        ("inventory", "Inventaire"),
        ("status", "Statut"),
        ("equipment", "Équipement"),
        ("schedule", "Planning"),
        ("last_maintenance", "Dernière maintenance"),
        ("next_maintenance", "Prochaine maintenance"),
        ("time_left", "Temps restant"),
        ("stock", "Stock"),
        ("min_stock", "Stock minimum"),
        ("total_items", "Articles au total"),
        ("low_stock_items", "Articles en rupture"),
        ("good", "Bon"),
        ("attention", "Attention"),
        ("urgent", "Urgent"),
        ("low", "Faible"),
        // User management
        ("manage_users", "Gestion des utilisateurs"),
        ("add_user", "Ajouter un utilisateur"),
        ("edit_user", "Modifier un utilisateur"),
        ("name", "Nom"),
        ("first_name", "Prénom"),
        ("last_name", "Nom de famille"),
        ("active", "Actif"),
        ("inactive", "Inactif"),
        ("superuser", "Super-utilisateur"),
        ("id", "ID"),
        ("actions", "Actions"),
        ("total", "Total"),
        ("platform", "Plateforme"),
        ("user_created", "Utilisateur créé"),
        ("user_updated", "Utilisateur modifié"),
        ("user_deleted", "Utilisateur supprimé"),
        ("user_create_failed", "Échec de la création de l'utilisateur"),
        ("user_update_failed", "Échec de la modification de l'utilisateur"),
        ("user_delete_failed", "Échec de la suppression de l'utilisateur"),
        // Common
        ("settings", "Paramètres"),
        ("profile", "Profil"),
        ("logout", "Déconnexion"),
        ("search", "Rechercher"),
        ("notifications", "Notifications"),
        ("dark_mode", "Mode sombre"),
        ("light_mode", "Mode clair"),
        ("language", "Langue"),
        ("save", "Enregistrer"),
        ("cancel", "Annuler"),
        ("submit", "Soumettre"),
        ("delete", "Supprimer"),
        ("edit", "Modifier"),
        ("view", "Voir"),
        ("back", "Retour"),
        ("next", "Suivant"),
        ("previous", "Précédent"),
        ("loading", "Chargement…"),
        ("error", "Erreur"),
        ("success", "Succès"),
        ("failed_to_load_data", "Impossible de charger les données"),
        ("sample_data", "Données d'exemple"),
        ("no_data", "Aucune donnée"),
        ("not_found", "Page introuvable"),
        ("go_home", "Retour au tableau de bord"),
        ("logged_out", "Déconnexion effectuée"),
        ("add_rfid", "Ajouter un badge"),
        ("rfid_added", "Badge ajouté"),
        ("rfid_updated", "Badge modifié"),
        ("rfid_deleted", "Badge supprimé"),
        ("toggle_status", "Activer / désactiver"),
        ("serviced", "Marquer entretenu"),
        ("restock", "Réapprovisionner"),
        ("maintenance_updated", "Entretien enregistré"),
        ("inventory_updated", "Stock mis à jour"),
        ("user_details", "Détails de l'utilisateur"),
    ])
});

static EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Navigation
        ("dashboard", "Dashboard"),
        ("energy", "Energy Consumption"),
        ("security", "Security"),
        ("material", "Material"),
        ("users", "User Management"),
        // Auth
        ("welcome", "Welcome to Mobilis"),
        ("login", "Login"),
        ("email", "Email"),
        ("password", "Password"),
        ("role", "Role"),
        ("admin", "Administrator"),
        ("manager", "Manager"),
        ("user", "User"),
        ("remember", "Remember me"),
        ("forgot", "Forgot password?"),
        ("signin", "Sign in"),
        ("logged_in", "Logged in successfully"),
        ("invalid_credentials", "Invalid credentials"),
        ("fill_required", "Please fill in all required fields"),
        ("session_checking", "Checking session…"),
        // Energy
        ("solar_panels", "Solar Panels"),
        ("temperature", "Temperature"),
        ("rb_cells", "RB Cells"),
        ("frequency", "Frequency"),
        ("consumption", "Consumption"),
        ("production", "Production"),
        ("efficiency", "Efficiency"),
        ("charge", "Charge"),
        ("decision", "Decision"),
        ("monitoring", "Monitoring"),
        ("current", "Current"),
        // Security
        ("rfid_users", "RFID Users"),
        ("alerts", "Alerts"),
        ("stats", "Statistics"),
        ("attempts", "Attempts (Theft Alerts)"),
        ("last_access", "Last access"),
        ("type", "Type"),
        ("zone", "Zone"),
        ("time", "Time"),
        ("authorized", "Authorized"),
        ("unauthorized", "Unauthorized"),
        ("critical", "Critical"),
        ("warning", "Warning"),
        // Material
        ("maintenance", "Material Maintenance"),
        ("management", "Material Management"),
        ("inventory", "Inventory"),
        ("status", "Status"),
        ("equipment", "Equipment"),
        ("schedule", "Schedule"),
        ("last_maintenance", "Last maintenance"),
        ("next_maintenance", "Next maintenance"),
        ("time_left", "Time left"),
        ("stock", "Stock"),
        ("min_stock", "Minimum stock"),
        ("total_items", "Total items"),
        ("low_stock_items", "Low stock items"),
        ("good", "Good"),
        ("attention", "Attention"),
        ("urgent", "Urgent"),
        ("low", "Low"),
        // User management
        ("manage_users", "Manage Users"),
        ("add_user", "Add User"),
        ("edit_user", "Edit User"),
        ("name", "Name"),
        ("first_name", "First name"),
        ("last_name", "Last name"),
        ("active", "Active"),
        ("inactive", "Inactive"),
        ("superuser", "Superuser"),
        ("id", "ID"),
        ("actions", "Actions"),
        ("total", "Total"),
        ("platform", "Platform"),
        ("user_created", "User created"),
        ("user_updated", "User updated"),
        ("user_deleted", "User deleted"),
        ("user_create_failed", "Failed to create user"),
        ("user_update_failed", "Failed to update user"),
        ("user_delete_failed", "Failed to delete user"),
        // Common
        ("settings", "Settings"),
        ("profile", "Profile"),
        ("logout", "Logout"),
        ("search", "Search"),
        ("notifications", "Notifications"),
        ("dark_mode", "Dark Mode"),
        ("light_mode", "Light Mode"),
        ("language", "Language"),
        ("save", "Save"),
        ("cancel", "Cancel"),
        ("submit", "Submit"),
        ("delete", "Delete"),
        ("edit", "Edit"),
        ("view", "View"),
        ("back", "Back"),
        ("next", "Next"),
        ("previous", "Previous"),
        ("loading", "Loading…"),
        ("error", "Error"),
        ("success", "Success"),
        ("failed_to_load_data", "Failed to load data"),
        ("sample_data", "Sample data"),
        ("no_data", "No data"),
        ("not_found", "Page not found"),
        ("go_home", "Back to dashboard"),
        ("logged_out", "Logged out"),
        ("add_rfid", "Add badge"),
        ("rfid_added", "Badge added"),
        ("rfid_updated", "Badge updated"),
        ("rfid_deleted", "Badge deleted"),
        ("toggle_status", "Toggle status"),
        ("serviced", "Mark serviced"),
        ("restock", "Restock"),
        ("maintenance_updated", "Maintenance recorded"),
        ("inventory_updated", "Stock updated"),
        ("user_details", "User details"),
    ])
});

static AR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Navigation
        ("dashboard", "لوحة القيادة"),
        ("energy", "استهلاك الطاقة"),
        ("security", "الأمان"),
        ("material", "المواد"),
        ("users", "إدارة المستخدمين"),
        // Auth
        ("welcome", "مرحبًا بك في موبيليس"),
        ("login", "تسجيل الدخول"),
        ("email", "البريد الإلكتروني"),
        ("password", "كلمة المرور"),
        ("role", "الدور"),
        ("admin", "مسؤول"),
        ("manager", "مدير"),
        ("user", "مستخدم"),
        ("remember", "تذكرني"),
        ("forgot", "نسيت كلمة المرور؟"),
        ("signin", "تسجيل الدخول"),
        ("logged_in", "تم تسجيل الدخول بنجاح"),
        ("invalid_credentials", "بيانات اعتماد غير صالحة"),
        ("fill_required", "يرجى ملء جميع الحقول المطلوبة"),
        ("session_checking", "جارٍ التحقق من الجلسة…"),
        // Energy
        ("solar_panels", "الألواح الشمسية"),
        ("temperature", "درجة الحرارة"),
        ("rb_cells", "خلايا RB"),
        ("frequency", "التردد"),
        ("consumption", "الاستهلاك"),
        ("production", "الإنتاج"),
        ("efficiency", "الكفاءة"),
        ("charge", "الشحن"),
        ("decision", "القرار"),
        ("monitoring", "المراقبة"),
        ("current", "الحالي"),
        // Security
        ("rfid_users", "مستخدمو RFID"),
        ("alerts", "التنبيهات"),
        ("stats", "الإحصائيات"),
        ("attempts", "المحاولات (تنبيهات السرقة)"),
        ("last_access", "آخر دخول"),
        ("type", "النوع"),
        ("zone", "المنطقة"),
        ("time", "الوقت"),
        ("authorized", "مصرح"),
        ("unauthorized", "غير مصرح"),
        ("critical", "حرج"),
        ("warning", "تحذير"),
        // Material
        ("maintenance", "صيانة المواد"),
        ("management", "إدارة المواد"),
        ("inventory", "المخزون"),
        ("status", "الحالة"),
        ("equipment", "المعدات"),
        ("schedule", "الجدول"),
        ("last_maintenance", "آخر صيانة"),
        ("next_maintenance", "الصيانة القادمة"),
        ("time_left", "الوقت المتبقي"),
        ("stock", "المخزون"),
        ("min_stock", "الحد الأدنى للمخزون"),
        ("total_items", "إجمالي العناصر"),
        ("low_stock_items", "عناصر منخفضة المخزون"),
        ("good", "جيد"),
        ("attention", "انتباه"),
        ("urgent", "عاجل"),
        ("low", "منخفض"),
        // User management
        ("manage_users", "إدارة المستخدمين"),
        ("add_user", "إضافة مستخدم"),
        ("edit_user", "تعديل المستخدم"),
        ("name", "الاسم"),
        ("first_name", "الاسم الأول"),
        ("last_name", "اسم العائلة"),
        ("active", "نشط"),
        ("inactive", "غير نشط"),
        ("superuser", "مستخدم متميز"),
        ("id", "المعرف"),
        ("actions", "الإجراءات"),
        ("total", "المجموع"),
        ("platform", "المنصة"),
        ("user_created", "تم إنشاء المستخدم"),
        ("user_updated", "تم تحديث المستخدم"),
        ("user_deleted", "تم حذف المستخدم"),
        ("user_create_failed", "فشل إنشاء المستخدم"),
        ("user_update_failed", "فشل تحديث المستخدم"),
        ("user_delete_failed", "فشل حذف المستخدم"),
        // Common
        ("settings", "الإعدادات"),
        ("profile", "الملف الشخصي"),
        ("logout", "تسجيل الخروج"),
        ("search", "بحث"),
        ("notifications", "الإشعارات"),
        ("dark_mode", "الوضع المظلم"),
        ("light_mode", "الوضع المضيء"),
        ("language", "اللغة"),
        ("save", "حفظ"),
        ("cancel", "إلغاء"),
        ("submit", "إرسال"),
        ("delete", "حذف"),
        ("edit", "تعديل"),
        ("view", "عرض"),
        ("back", "رجوع"),
        ("next", "التالي"),
        ("previous", "السابق"),
        ("loading", "جارٍ التحميل…"),
        ("error", "خطأ"),
        ("success", "نجاح"),
        ("failed_to_load_data", "فشل تحميل البيانات"),
        ("sample_data", "بيانات تجريبية"),
        ("no_data", "لا توجد بيانات"),
        ("not_found", "الصفحة غير موجودة"),
        ("go_home", "العودة إلى لوحة القيادة"),
        ("logged_out", "تم تسجيل الخروج"),
        ("add_rfid", "إضافة شارة"),
        ("rfid_added", "تمت إضافة الشارة"),
        ("rfid_updated", "تم تحديث الشارة"),
        ("rfid_deleted", "تم حذف الشارة"),
        ("toggle_status", "تبديل الحالة"),
        ("serviced", "تمت الصيانة"),
        ("restock", "إعادة التزويد"),
        ("maintenance_updated", "تم تسجيل الصيانة"),
        ("inventory_updated", "تم تحديث المخزون"),
        ("user_details", "تفاصيل المستخدم"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_key() {
        let t = Translator::new(Language::En);
        assert_eq!(t.translate("dashboard"), "Dashboard");
        let t = Translator::new(Language::Fr);
        assert_eq!(t.translate("dashboard"), "Tableau de bord");
    }

    #[test]
    fn test_missing_key_returns_key_for_every_language() {
        for &lang in Language::ALL {
            let t = Translator::new(lang);
            for key in ["definitely_missing", "", "Dashboard", "energy.solar"] {
                assert_eq!(t.translate(key), key, "{lang:?} should echo {key:?}");
            }
        }
    }

    #[test]
    fn test_dictionaries_share_keys() {
        let mut fr: Vec<_> = FR.keys().copied().collect();
        let mut en: Vec<_> = EN.keys().copied().collect();
        let mut ar: Vec<_> = AR.keys().copied().collect();
        fr.sort_unstable();
        en.sort_unstable();
        ar.sort_unstable();
        assert_eq!(fr, en);
        assert_eq!(en, ar);
    }

    #[test]
    fn test_set_language_switches_lookup() {
        let mut t = Translator::default();
        assert_eq!(t.language(), Language::Fr);
        t.set_language(Language::Ar);
        assert_eq!(t.t("logout"), "تسجيل الخروج");
        assert!(t.language().is_rtl());
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Language::from_tag(" EN "), Some(Language::En));
        assert_eq!(Language::from_tag("ar"), Some(Language::Ar));
        assert_eq!(Language::from_tag("de"), None);
        for &lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.tag()), Some(lang));
        }
    }
}
