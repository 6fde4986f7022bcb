use crate::error::Error::InvalidVersion;
use crate::error::Result;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

/// Constants representing the Java version 1.0.2.
pub const JAVA_1_0_2: Version = Version::Java1_0_2 { minor: 0 };
/// Constants representing the Java version 1.1.
pub const JAVA_1_1: Version = Version::Java1_1 { minor: 0 };
/// Constants representing the Java version 1.2.
pub const JAVA_1_2: Version = Version::Java1_2 { minor: 0 };
/// Constants representing the Java version 1.3.
pub const JAVA_1_3: Version = Version::Java1_3 { minor: 0 };
/// Constants representing the Java version 1.4.
pub const JAVA_1_4: Version = Version::Java1_4 { minor: 0 };
/// Constants representing the Java version 5.0.
pub const JAVA_5: Version = Version::Java5 { minor: 0 };
/// Constants representing the Java version 6.
pub const JAVA_6: Version = Version::Java6 { minor: 0 };
/// Constants representing the Java version 7.
pub const JAVA_7: Version = Version::Java7 { minor: 0 };
/// Constants representing the Java version 8.
pub const JAVA_8: Version = Version::Java8 { minor: 0 };

/// Implementation of Version based on `ClassFile` format for major/minor versions.
///
/// Represents the Java version that corresponds to a specific `ClassFile` format version. Each enum
/// variant corresponds to a specific Java version with its associated minor version. Only the
/// major versions emitted by a Java 8 language-level compiler (45.3 through 52.0) are modeled;
/// later `ClassFile` formats are out of scope.
///
/// # Examples
///
/// Creating and working with Version objects:
///
/// ```rust
/// use javac_classfile::Version;
/// use std::io::Cursor;
///
/// // Create a Version from major and minor version numbers
/// let java7 = Version::from(51, 0)?;
/// let java8 = Version::from(52, 0)?;
///
/// // Compare versions
/// assert!(java8.supports(&java7)); // Java 8 supports Java 7 features
/// assert!(!java7.supports(&java8)); // Java 7 doesn't support Java 8 features
///
/// // Get the display name of the version
/// assert_eq!(java8.to_string(), "Java 8");
///
/// // Serialize and deserialize a version
/// let mut bytes = Vec::new();
/// java8.to_bytes(&mut bytes)?;
///
/// let mut cursor = Cursor::new(bytes);
/// let deserialized = Version::from_bytes(&mut cursor)?;
/// assert_eq!(deserialized, java8);
/// # Ok::<(), javac_classfile::Error>(())
/// ```
///
/// #  Reference
///
/// See: <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html#jvms-4.1>
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd)]
pub enum Version {
    Java1_0_2 { minor: u16 },
    Java1_1 { minor: u16 },
    Java1_2 { minor: u16 },
    Java1_3 { minor: u16 },
    Java1_4 { minor: u16 },
    Java5 { minor: u16 },
    Java6 { minor: u16 },
    Java7 { minor: u16 },
    Java8 { minor: u16 },
}

impl Version {
    /// Create a new version from a major and minor version.
    ///
    /// The major version determines the Java version, while the minor version typically
    /// indicates incremental updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the major and minor version are invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// // Create Java 8 version
    /// let java8 = Version::from(52, 0)?;
    /// assert_eq!(java8.major(), 52);
    /// assert_eq!(java8.minor(), 0);
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    pub fn from(major: u16, minor: u16) -> Result<Self> {
        let version = match major {
            45 => Version::Java1_0_2 { minor },
            46 => Version::Java1_2 { minor },
            47 => Version::Java1_3 { minor },
            48 => Version::Java1_4 { minor },
            49 => Version::Java5 { minor },
            50 => Version::Java6 { minor },
            51 => Version::Java7 { minor },
            52 => Version::Java8 { minor },
            _ => return Err(InvalidVersion { major, minor }),
        };

        Ok(version)
    }

    /// Returns the major version.
    ///
    /// The major version corresponds to the Java version according to the `ClassFile` format.
    /// For example, Java 8 has a major version of 52.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// let version = Version::from(52, 0)?; // Java 8
    /// assert_eq!(version.major(), 52);
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    #[must_use]
    pub fn major(&self) -> u16 {
        match self {
            Version::Java1_0_2 { .. } | Version::Java1_1 { .. } => 45,
            Version::Java1_2 { .. } => 46,
            Version::Java1_3 { .. } => 47,
            Version::Java1_4 { .. } => 48,
            Version::Java5 { .. } => 49,
            Version::Java6 { .. } => 50,
            Version::Java7 { .. } => 51,
            Version::Java8 { .. } => 52,
        }
    }

    /// Returns the minor version.
    ///
    /// The minor version is typically 0 for standard releases, or 3 for the Java 1.0.2
    /// `ClassFile` format predating the introduction of finally blocks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// let standard = Version::from(52, 0)?; // Java 8
    /// assert_eq!(standard.minor(), 0);
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    #[must_use]
    pub fn minor(&self) -> u16 {
        match self {
            Version::Java1_0_2 { minor, .. }
            | Version::Java1_1 { minor, .. }
            | Version::Java1_2 { minor, .. }
            | Version::Java1_3 { minor, .. }
            | Version::Java1_4 { minor, .. }
            | Version::Java5 { minor, .. }
            | Version::Java6 { minor, .. }
            | Version::Java7 { minor, .. }
            | Version::Java8 { minor, .. } => *minor,
        }
    }

    /// Returns the major version for Java (e.g. 8 for Java 8).
    ///
    /// This converts the internal major version number to the more commonly used
    /// Java version number by subtracting 44.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// let version = Version::from(52, 0)?; // Java 8
    /// assert_eq!(version.java(), 8);
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    #[must_use]
    pub fn java(&self) -> u16 {
        self.major() - 44
    }

    /// Returns true if the current major version supports the given version.
    ///
    /// A Java version supports all earlier versions but not later ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// let java7 = Version::from(51, 0)?;
    /// let java8 = Version::from(52, 0)?;
    ///
    /// // Java 8 supports Java 7 features
    /// assert!(java8.supports(&java7));
    ///
    /// // Java 7 does not support Java 8 features
    /// assert!(!java7.supports(&java8));
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    #[must_use]
    pub fn supports(&self, version: &Version) -> bool {
        self.major() >= version.major()
    }

    /// Deserialize the major and minor version bytes.
    ///
    /// Reads the version information from a cursor pointing to the binary data
    /// representing the class file's minor and major version.
    ///
    /// ```text
    /// |--------------------- u32 ---------------------|
    /// |--------- u16 ---------|--------- u16 ---------|
    /// |      Minor Ver.       |      Major Ver.       |
    /// |     31 30 29 .. 16    |     15 14 13 .. 0     |
    /// ```
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    /// use std::io::Cursor;
    /// use byteorder::{BigEndian, WriteBytesExt};
    ///
    /// // Create a binary representation of Java 8 (major: 52, minor: 0)
    /// let mut buffer = Vec::new();
    /// buffer.write_u16::<BigEndian>(0)?; // minor version
    /// buffer.write_u16::<BigEndian>(52)?; // major version
    ///
    /// let mut cursor = Cursor::new(buffer);
    /// let version = Version::from_bytes(&mut cursor)?;
    ///
    /// assert_eq!(version.major(), 52);
    /// assert_eq!(version.minor(), 0);
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns an error if reading from the byte cursor fails or if the version is invalid.
    pub fn from_bytes(bytes: &mut Cursor<Vec<u8>>) -> Result<Version> {
        let minor = bytes.read_u16::<BigEndian>()?;
        let major = bytes.read_u16::<BigEndian>()?;
        Version::from(major, minor)
    }

    /// Serialize the major and minor version to bytes.
    ///
    /// Writes the version information to a vector of bytes according to the `ClassFile` format.
    ///
    /// ```text
    /// |--------------------- u32 ---------------------|
    /// |--------- u16 ---------|--------- u16 ---------|
    /// |      Minor Ver.       |      Major Ver.       |
    /// |     31 30 29 .. 16    |     15 14 13 .. 0     |
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the byte vector fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    /// use std::io::Cursor;
    /// use byteorder::{BigEndian, ReadBytesExt};
    ///
    /// let version = Version::from(52, 0)?; // Java 8
    /// let mut bytes = Vec::new();
    /// version.to_bytes(&mut bytes)?;
    ///
    /// // The bytes should represent minor version (0) followed by major version (52)
    /// let mut cursor = Cursor::new(bytes);
    /// assert_eq!(cursor.read_u16::<BigEndian>()?, 0); // minor version
    /// assert_eq!(cursor.read_u16::<BigEndian>()?, 52); // major version
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BigEndian>(self.minor())?;
        bytes.write_u16::<BigEndian>(self.major())?;
        Ok(())
    }
}

impl Default for Version {
    /// Returns the default version, which is Java 1.0.2 with minor version 0.
    ///
    /// This is useful when you need to initialize a `Version` with the earliest supported Java
    /// version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// // Create a default Version
    /// let version = Version::default();
    ///
    /// // The default version is Java 1.0.2
    /// assert_eq!(version.to_string(), "Java 1.0.2");
    /// assert_eq!(version.major(), 45);
    /// assert_eq!(version.minor(), 0);
    /// ```
    fn default() -> Self {
        Version::Java1_0_2 { minor: 0 }
    }
}

impl fmt::Display for Version {
    /// Formats the Version as a human-readable string.
    ///
    /// The version is displayed as "Java X" where X is the Java version number.
    /// For older versions (1.0.2 through 1.4), the format follows the historical
    /// naming convention with decimals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use javac_classfile::Version;
    ///
    /// let java1_2 = Version::from(46, 0)?;
    /// assert_eq!(java1_2.to_string(), "Java 1.2");
    ///
    /// let java5 = Version::from(49, 0)?;
    /// assert_eq!(java5.to_string(), "Java 5");
    ///
    /// let java8 = Version::from(52, 0)?;
    /// assert_eq!(java8.to_string(), "Java 8");
    ///
    /// # Ok::<(), javac_classfile::Error>(())
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Java1_0_2 { .. } => write!(f, "Java 1.0.2"),
            Version::Java1_1 { .. } => write!(f, "Java 1.1"),
            Version::Java1_2 { .. } => write!(f, "Java 1.2"),
            Version::Java1_3 { .. } => write!(f, "Java 1.3"),
            Version::Java1_4 { .. } => write!(f, "Java 1.4"),
            Version::Java5 { .. } => write!(f, "Java 5"),
            Version::Java6 { .. } => write!(f, "Java 6"),
            Version::Java7 { .. } => write!(f, "Java 7"),
            Version::Java8 { .. } => write!(f, "Java 8"),
        }
    }
}
